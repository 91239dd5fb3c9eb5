use crate::catalog::Catalog;
use crate::feed::types::{SpoilageReason, SpoilageRecord};
use chrono::NaiveDate;
use thiserror::Error;

pub const DEFAULT_RECENT_ROWS: usize = 10;
const UNKNOWN_PRODUCT: &str = "Unknown Product";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpoilageError {
    #[error("waste quantity must be at least 1, got {quantity}")]
    InvalidQuantity { quantity: i64 },
}

/// A waste entry as typed by the store manager.
#[derive(Debug, Clone)]
pub struct WasteEntry {
    pub sku: String,
    pub quantity: i64,
    pub reason: SpoilageReason,
    /// Defaults to today when absent.
    pub recorded_date: Option<NaiveDate>,
}

/// Spoilage records for one store, newest first.
#[derive(Debug, Clone, Default)]
pub struct SpoilageLog {
    records: Vec<SpoilageRecord>,
}

impl SpoilageLog {
    pub fn new(mut records: Vec<SpoilageRecord>) -> Self {
        sort_newest_first(&mut records);
        Self { records }
    }

    pub fn records(&self) -> &[SpoilageRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn recent(&self, n: usize) -> &[SpoilageRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn total_units(&self) -> u64 {
        self.records.iter().map(|r| u64::from(r.quantity)).sum()
    }

    /// Units per reason, in the order each reason first appears.
    pub fn by_reason(&self) -> Vec<(SpoilageReason, u64)> {
        let mut totals: Vec<(SpoilageReason, u64)> = Vec::new();
        for r in &self.records {
            match totals.iter_mut().find(|(reason, _)| *reason == r.reason) {
                Some((_, units)) => *units += u64::from(r.quantity),
                None => totals.push((r.reason, u64::from(r.quantity))),
            }
        }
        totals
    }

    /// Units per product name, in the order each product first appears.
    pub fn by_product(&self) -> Vec<(String, u64)> {
        let mut totals: Vec<(String, u64)> = Vec::new();
        for r in &self.records {
            match totals.iter_mut().find(|(name, _)| *name == r.product_name) {
                Some((_, units)) => *units += u64::from(r.quantity),
                None => totals.push((r.product_name.clone(), u64::from(r.quantity))),
            }
        }
        totals
    }

    /// Record new waste. Same-day entries land ahead of older ones for that date.
    pub fn log_waste(&mut self, catalog: &Catalog, entry: WasteEntry) -> Result<&SpoilageRecord, SpoilageError> {
        let quantity = u32::try_from(entry.quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(SpoilageError::InvalidQuantity {
                quantity: entry.quantity,
            })?;
        let product_name = catalog
            .product(&entry.sku)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
        let recorded_date = entry
            .recorded_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        tracing::info!(sku = %entry.sku, quantity, reason = %entry.reason, %recorded_date, "waste logged");

        self.records.insert(
            0,
            SpoilageRecord {
                sku: entry.sku,
                product_name,
                quantity,
                reason: entry.reason,
                recorded_date,
            },
        );
        sort_newest_first(&mut self.records);
        let idx = self
            .records
            .iter()
            .position(|r| r.recorded_date == recorded_date)
            .unwrap_or(0);
        Ok(&self.records[idx])
    }
}

fn sort_newest_first(records: &mut [SpoilageRecord]) {
    records.sort_by(|a, b| b.recorded_date.cmp(&a.recorded_date));
}

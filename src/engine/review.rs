//! The recommendation review engine: one store's batch of order
//! recommendations, the active filters, and the multi-select set.
//!
//! Every operation runs to completion on `&mut self`; there is exactly one
//! writer. Edits replace the affected record rather than mutating it, and the
//! filtered view is recomputed on every read so selection and display are
//! always derived from the same map.

use super::filter::{CategoryFilter, StatusFilter};
use super::quantity::{parse_quantity, QuantityInputPolicy, ReviewError};
use super::recommendation::OrderRecommendation;
use super::status::ReviewStatus;
use crate::catalog::Catalog;
use crate::feed::types::RecommendationRecord;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Unit totals across the whole batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchTotals {
    pub recommended_units: i64,
    pub adjusted_units: i64,
}

pub struct ReviewEngine {
    order: Vec<String>, // display order
    recommendations: HashMap<String, OrderRecommendation>,
    selected: HashSet<String>,
    status_filter: StatusFilter,
    category_filter: CategoryFilter,
    catalog: Arc<Catalog>,
    quantity_policy: QuantityInputPolicy,
}

impl ReviewEngine {
    pub fn new(catalog: Arc<Catalog>, records: Vec<RecommendationRecord>) -> Self {
        let mut order = Vec::with_capacity(records.len());
        let mut recommendations = HashMap::with_capacity(records.len());
        for record in records {
            if recommendations.contains_key(&record.sku) {
                tracing::warn!(sku = %record.sku, "duplicate sku in batch, keeping first");
                continue;
            }
            order.push(record.sku.clone());
            recommendations.insert(record.sku.clone(), OrderRecommendation::from(record));
        }
        Self {
            order,
            recommendations,
            selected: HashSet::new(),
            status_filter: StatusFilter::All,
            category_filter: CategoryFilter::All,
            catalog,
            quantity_policy: QuantityInputPolicy::default(),
        }
    }

    /// An engine with no recommendations, e.g. after a failed fetch.
    pub fn empty(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, Vec::new())
    }

    pub fn with_quantity_policy(mut self, policy: QuantityInputPolicy) -> Self {
        self.quantity_policy = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, sku: &str) -> Option<&OrderRecommendation> {
        self.recommendations.get(sku)
    }

    /// Every recommendation in display order, ignoring filters.
    pub fn iter(&self) -> impl Iterator<Item = &OrderRecommendation> {
        self.order.iter().filter_map(|sku| self.recommendations.get(sku))
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn category_filter(&self) -> &CategoryFilter {
        &self.category_filter
    }

    pub fn quantity_policy(&self) -> QuantityInputPolicy {
        self.quantity_policy
    }

    // --- Edits ---

    /// Set the manager's quantity. Only the adjusted bit follows the new value.
    pub fn set_adjusted_qty(&mut self, sku: &str, qty: i64) {
        if self.replace_with(sku, |rec| rec.with_adjusted_qty(qty)) {
            tracing::debug!(sku, qty, "adjusted quantity");
            self.normalize_selection();
        }
    }

    /// Parse raw quantity text with the engine's input policy, then apply it.
    /// Under the reject policy bad input leaves the record untouched.
    pub fn set_quantity_input(&mut self, sku: &str, input: &str) -> Result<(), ReviewError> {
        let qty = parse_quantity(input, self.quantity_policy)?;
        self.set_adjusted_qty(sku, qty);
        Ok(())
    }

    pub fn set_justification(&mut self, sku: &str, text: &str) {
        self.replace_with(sku, |rec| rec.with_justification(text));
    }

    pub fn approve(&mut self, sku: &str) {
        if self.replace_with(sku, OrderRecommendation::approved) {
            tracing::info!(sku, "approved recommendation");
            self.normalize_selection();
        }
    }

    /// Approve every selected SKU that is visible under the active filters,
    /// then clear the selection. Returns how many were approved.
    pub fn approve_selected(&mut self) -> usize {
        let targets: Vec<String> = self
            .filtered_view()
            .into_iter()
            .filter(|rec| self.selected.contains(&rec.sku))
            .map(|rec| rec.sku.clone())
            .collect();
        for sku in &targets {
            self.replace_with(sku, OrderRecommendation::approved);
        }
        self.selected.clear();
        tracing::info!(count = targets.len(), "bulk approved selection");
        targets.len()
    }

    // --- Selection ---

    /// Flip one SKU in or out of the selection. SKUs outside the filtered
    /// view are ignored.
    pub fn toggle_select(&mut self, sku: &str) {
        if self.selected.remove(sku) {
            return;
        }
        if self.is_visible(sku) {
            self.selected.insert(sku.to_string());
        }
    }

    pub fn select_all(&mut self, checked: bool) {
        self.selected = if checked {
            self.filtered_view()
                .into_iter()
                .map(|rec| rec.sku.clone())
                .collect()
        } else {
            HashSet::new()
        };
    }

    pub fn is_selected(&self, sku: &str) -> bool {
        self.selected.contains(sku)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected SKUs in display order.
    pub fn selected_skus(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|sku| self.selected.contains(*sku))
            .map(String::as_str)
            .collect()
    }

    /// Tri-state helper for a select-all checkbox.
    pub fn is_all_selected(&self) -> bool {
        let visible = self.filtered_view().len();
        !self.selected.is_empty() && visible > 0 && self.selected.len() == visible
    }

    // --- Filters ---

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.normalize_selection();
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.category_filter = filter;
        self.normalize_selection();
    }

    /// The batch under the active filters, in display order.
    pub fn filtered_view(&self) -> Vec<&OrderRecommendation> {
        self.view_with(self.status_filter, &self.category_filter)
    }

    /// The batch under arbitrary filters, in display order.
    pub fn view_with(
        &self,
        status: StatusFilter,
        category: &CategoryFilter,
    ) -> Vec<&OrderRecommendation> {
        self.iter()
            .filter(|rec| {
                status.matches(rec.status()) && category.matches(self.catalog.category_of(&rec.sku))
            })
            .collect()
    }

    // --- Summaries ---

    /// How many recommendations sit in each status, in selector order.
    pub fn status_counts(&self) -> Vec<(ReviewStatus, usize)> {
        ReviewStatus::ALL
            .into_iter()
            .map(|status| (status, self.iter().filter(|r| r.status() == status).count()))
            .collect()
    }

    /// Unit sums saturate at the `i64` bounds; any quantity is accepted as input.
    pub fn totals(&self) -> BatchTotals {
        self.iter().fold(BatchTotals::default(), |acc, rec| BatchTotals {
            recommended_units: acc.recommended_units.saturating_add(rec.recommended_qty),
            adjusted_units: acc.adjusted_units.saturating_add(rec.adjusted_qty()),
        })
    }

    // --- Internals ---

    fn is_visible(&self, sku: &str) -> bool {
        self.recommendations.get(sku).is_some_and(|rec| {
            self.status_filter.matches(rec.status())
                && self.category_filter.matches(self.catalog.category_of(sku))
        })
    }

    /// Drop selected SKUs that are no longer in the filtered view.
    fn normalize_selection(&mut self) {
        let before = self.selected.len();
        let selected = std::mem::take(&mut self.selected);
        self.selected = selected
            .into_iter()
            .filter(|sku| self.is_visible(sku))
            .collect();
        let dropped = before - self.selected.len();
        if dropped > 0 {
            tracing::debug!(dropped, "selection narrowed to filtered view");
        }
    }

    /// Replace one record with an edited copy. Unknown SKUs are a no-op.
    fn replace_with(
        &mut self,
        sku: &str,
        edit: impl FnOnce(&OrderRecommendation) -> OrderRecommendation,
    ) -> bool {
        let Some(current) = self.recommendations.get(sku) else {
            tracing::debug!(sku, "edit for unknown sku ignored");
            return false;
        };
        let next = edit(current);
        self.recommendations.insert(sku.to_string(), next);
        true
    }
}

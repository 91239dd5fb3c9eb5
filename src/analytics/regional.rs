use crate::catalog::{Catalog, User};
use crate::engine::filter::ALL_LABEL;
use crate::feed::types::RegionalStorePerformance;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionalSummary {
    pub total_spoilage: f64,
    pub mean_accuracy: f64,
    pub best_store: Option<String>,
    pub worst_store: Option<String>,
}

/// Region picker, per-store drill-down and the performance rows of the
/// selected region.
#[derive(Debug, Clone)]
pub struct RegionalView {
    regions: Vec<String>,
    stores_by_region: Vec<(String, Vec<String>)>,
    region: Option<String>,
    store: Option<String>,
    rows: Vec<RegionalStorePerformance>,
}

impl RegionalView {
    pub fn new(catalog: &Catalog, user: &User) -> Self {
        let regions = catalog.regions();
        let stores_by_region = regions
            .iter()
            .map(|r| {
                let names = catalog
                    .stores_in_region(r)
                    .into_iter()
                    .map(|s| s.name.clone())
                    .collect();
                (r.clone(), names)
            })
            .collect();
        let region = user
            .region
            .clone()
            .or_else(|| regions.first().cloned());
        Self {
            regions,
            stores_by_region,
            region,
            store: None,
            rows: Vec::new(),
        }
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Selected store, `None` meaning all stores in the region.
    pub fn store(&self) -> Option<&str> {
        self.store.as_deref()
    }

    pub fn stores_in_region(&self) -> &[String] {
        self.region
            .as_deref()
            .and_then(|r| self.stores_by_region.iter().find(|(name, _)| name == r))
            .map(|(_, stores)| stores.as_slice())
            .unwrap_or(&[])
    }

    /// Change region. Resets the store filter and drops rows of the old region.
    pub fn set_region(&mut self, region: &str) -> bool {
        if self.region.as_deref() == Some(region) {
            return false;
        }
        self.region = Some(region.to_string());
        self.store = None;
        self.rows.clear();
        true
    }

    pub fn next_region(&mut self) -> bool {
        let next = match self.region.as_deref() {
            Some(current) => {
                let idx = self.regions.iter().position(|r| r == current);
                match idx {
                    Some(i) => self.regions.get((i + 1) % self.regions.len()),
                    None => self.regions.first(),
                }
            }
            None => self.regions.first(),
        }
        .cloned();
        match next {
            Some(region) => self.set_region(&region),
            None => false,
        }
    }

    /// `"All"` (or `None`) clears the store filter.
    pub fn select_store(&mut self, store: Option<&str>) {
        self.store = store
            .filter(|s| *s != ALL_LABEL)
            .map(str::to_string);
    }

    /// Cycle All -> each store in the region -> All.
    pub fn next_store(&mut self) {
        let stores = self.stores_in_region();
        let next = match self.store.as_deref() {
            None => stores.first().cloned(),
            Some(current) => stores
                .iter()
                .position(|s| s == current)
                .and_then(|i| stores.get(i + 1))
                .cloned(),
        };
        self.store = next;
    }

    pub fn set_rows(&mut self, rows: Vec<RegionalStorePerformance>) {
        self.rows = rows;
    }

    pub fn displayed(&self) -> Vec<&RegionalStorePerformance> {
        self.rows
            .iter()
            .filter(|row| match &self.store {
                Some(store) => &row.store_name == store,
                None => true,
            })
            .collect()
    }

    pub fn title(&self) -> String {
        match (&self.store, &self.region) {
            (Some(store), _) => format!("Store Performance: {}", store),
            (None, Some(region)) => format!("Regional Performance: {}", region),
            (None, None) => "Regional Performance".to_string(),
        }
    }

    pub fn summary(&self) -> RegionalSummary {
        let rows = self.displayed();
        let total_spoilage = rows.iter().map(|r| r.total_spoilage).sum();
        let mean_accuracy = if rows.is_empty() {
            0.0
        } else {
            rows.iter().map(|r| r.order_accuracy).sum::<f64>() / rows.len() as f64
        };
        let best_store = rows
            .iter()
            .max_by(|a, b| a.order_accuracy.total_cmp(&b.order_accuracy))
            .map(|r| r.store_name.clone());
        let worst_store = rows
            .iter()
            .min_by(|a, b| a.order_accuracy.total_cmp(&b.order_accuracy))
            .map(|r| r.store_name.clone());
        RegionalSummary {
            total_spoilage,
            mean_accuracy,
            best_store,
            worst_store,
        }
    }
}

use super::types::*;
use super::DataSource;
use crate::catalog::{ProductSku, Store, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Data source backed by in-memory fixtures, optionally loaded from a
/// directory of JSON files. Keys that have no fixture return empty data.
///
/// Directory layout (all files optional):
/// `users.json`, `stores.json`, `products.json`, `justification_reasons.json`,
/// `corporate_dashboard.json`, and the keyed maps `recommendations.json`,
/// `spoilage.json`, `order_history.json`, `notifications.json` (by store name)
/// and `regional_performance.json` (by region).
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    users: Vec<User>,
    stores: Vec<Store>,
    products: Vec<ProductSku>,
    justification_reasons: Vec<String>,
    recommendations: HashMap<String, Vec<RecommendationRecord>>,
    spoilage: HashMap<String, Vec<SpoilageRecord>>,
    order_history: HashMap<String, Vec<OrderHistoryEntry>>,
    notifications: HashMap<String, Vec<Notification>>,
    regional_performance: HashMap<String, Vec<RegionalStorePerformance>>,
    corporate: CorporateDashboard,
    latency: Duration,
    store_latency: HashMap<String, Duration>,
}

fn read_optional<T: DeserializeOwned + Default>(dir: &Path, name: &str) -> Result<T> {
    let path = dir.join(name);
    if !path.exists() {
        tracing::debug!(file = %path.display(), "fixture file absent, using empty data");
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse fixture file: {}", path.display()))
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("fixture directory not found: {}", dir.display());
        }
        let source = Self {
            users: read_optional(dir, "users.json")?,
            stores: read_optional(dir, "stores.json")?,
            products: read_optional(dir, "products.json")?,
            justification_reasons: read_optional(dir, "justification_reasons.json")?,
            recommendations: read_optional(dir, "recommendations.json")?,
            spoilage: read_optional(dir, "spoilage.json")?,
            order_history: read_optional(dir, "order_history.json")?,
            notifications: read_optional(dir, "notifications.json")?,
            regional_performance: read_optional(dir, "regional_performance.json")?,
            corporate: read_optional(dir, "corporate_dashboard.json")?,
            ..Self::default()
        };
        tracing::info!(
            dir = %dir.display(),
            stores = source.stores.len(),
            products = source.products.len(),
            batches = source.recommendations.len(),
            "loaded fixture data"
        );
        Ok(source)
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn with_stores(mut self, stores: Vec<Store>) -> Self {
        self.stores = stores;
        self
    }

    pub fn with_products(mut self, products: Vec<ProductSku>) -> Self {
        self.products = products;
        self
    }

    pub fn with_justification_reasons(mut self, reasons: Vec<String>) -> Self {
        self.justification_reasons = reasons;
        self
    }

    pub fn with_recommendations(mut self, store: &str, recs: Vec<RecommendationRecord>) -> Self {
        self.recommendations.insert(store.to_string(), recs);
        self
    }

    pub fn with_spoilage(mut self, store: &str, records: Vec<SpoilageRecord>) -> Self {
        self.spoilage.insert(store.to_string(), records);
        self
    }

    pub fn with_order_history(mut self, store: &str, entries: Vec<OrderHistoryEntry>) -> Self {
        self.order_history.insert(store.to_string(), entries);
        self
    }

    pub fn with_notifications(mut self, store: &str, notifications: Vec<Notification>) -> Self {
        self.notifications.insert(store.to_string(), notifications);
        self
    }

    pub fn with_regional_performance(
        mut self,
        region: &str,
        rows: Vec<RegionalStorePerformance>,
    ) -> Self {
        self.regional_performance.insert(region.to_string(), rows);
        self
    }

    pub fn with_corporate_dashboard(mut self, dashboard: CorporateDashboard) -> Self {
        self.corporate = dashboard;
        self
    }

    /// Simulated backend latency applied to every fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Extra latency for one store's recommendation fetches.
    pub fn with_store_latency(mut self, store: &str, latency: Duration) -> Self {
        self.store_latency.insert(store.to_string(), latency);
        self
    }

    async fn simulate_latency(&self, store: Option<&str>) {
        let extra = store
            .and_then(|s| self.store_latency.get(s))
            .copied()
            .unwrap_or_default();
        let total = self.latency + extra;
        if !total.is_zero() {
            tokio::time::sleep(total).await;
        }
    }
}

fn keyed<T: Clone>(map: &HashMap<String, Vec<T>>, key: &str) -> Vec<T> {
    map.get(key).cloned().unwrap_or_default()
}

#[async_trait]
impl DataSource for FixtureSource {
    async fn fetch_recommendations(&self, store_name: &str) -> Result<Vec<RecommendationRecord>> {
        self.simulate_latency(Some(store_name)).await;
        Ok(keyed(&self.recommendations, store_name))
    }

    async fn fetch_justification_reasons(&self) -> Result<Vec<String>> {
        self.simulate_latency(None).await;
        Ok(self.justification_reasons.clone())
    }

    async fn fetch_product_catalog(&self) -> Result<Vec<ProductSku>> {
        self.simulate_latency(None).await;
        Ok(self.products.clone())
    }

    async fn fetch_users(&self) -> Result<Vec<User>> {
        self.simulate_latency(None).await;
        Ok(self.users.clone())
    }

    async fn fetch_stores(&self) -> Result<Vec<Store>> {
        self.simulate_latency(None).await;
        Ok(self.stores.clone())
    }

    async fn fetch_spoilage(&self, store_name: &str) -> Result<Vec<SpoilageRecord>> {
        self.simulate_latency(None).await;
        Ok(keyed(&self.spoilage, store_name))
    }

    async fn fetch_order_history(&self, store_name: &str) -> Result<Vec<OrderHistoryEntry>> {
        self.simulate_latency(None).await;
        Ok(keyed(&self.order_history, store_name))
    }

    async fn fetch_notifications(&self, store_name: &str) -> Result<Vec<Notification>> {
        self.simulate_latency(None).await;
        Ok(keyed(&self.notifications, store_name))
    }

    async fn fetch_regional_performance(&self, region: &str) -> Result<Vec<RegionalStorePerformance>> {
        self.simulate_latency(None).await;
        Ok(keyed(&self.regional_performance, region))
    }

    async fn fetch_corporate_dashboard(&self) -> Result<CorporateDashboard> {
        self.simulate_latency(None).await;
        Ok(self.corporate.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_unknown_store_is_empty() {
        let src = FixtureSource::new();
        assert!(src.fetch_recommendations("Nowhere").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_builder_serves_store_batch() {
        let rec = RecommendationRecord {
            sku: "PROD-001".to_string(),
            product_name: "Organic Bananas".to_string(),
            current_inventory: 50,
            forecasted_qty: 30,
            recommended_qty: 20,
            target_delivery_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        };
        let src = FixtureSource::new().with_recommendations("GreenGrocer Downtown", vec![rec.clone()]);
        let got = src.fetch_recommendations("GreenGrocer Downtown").await.unwrap();
        assert_eq!(got, vec![rec]);
    }

    #[test]
    fn test_load_dir_missing() {
        assert!(FixtureSource::load_dir(Path::new("/definitely/not/here")).is_err());
    }

    #[tokio::test]
    async fn test_load_shipped_fixtures() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let src = FixtureSource::load_dir(&dir).unwrap();
        let products = src.fetch_product_catalog().await.unwrap();
        assert!(products.iter().any(|p| p.sku == "DAIRY-001"));
        let recs = src.fetch_recommendations("GreenGrocer Downtown").await.unwrap();
        assert!(!recs.is_empty());
    }
}

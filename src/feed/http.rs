use super::types::*;
use super::DataSource;
use crate::catalog::{ProductSku, Store, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Dashboard backend over HTTP. Store and region names are sent as
/// percent-encoded path segments.
pub struct HttpDataSource {
    client: Client,
    base_url: Url,
}

impl HttpDataSource {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid data source base url: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("data source base url cannot carry a path: {}", base_url);
        }
        let client = Client::builder()
            .timeout(request_timeout)
            .pool_max_idle_per_host(4)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// Append path segments to the base url, encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments);
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url.path()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed ({}): {}", url.path(), status, body);
        }
        let parsed = resp
            .json()
            .await
            .with_context(|| format!("failed to parse response from {}", url.path()))?;
        tracing::debug!(path = %url.path(), "fetched");
        Ok(parsed)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_recommendations(&self, store_name: &str) -> Result<Vec<RecommendationRecord>> {
        self.get_json(&["api", "order-recommendations", store_name]).await
    }

    async fn fetch_justification_reasons(&self) -> Result<Vec<String>> {
        self.get_json(&["data", "justification_reasons.json"]).await
    }

    async fn fetch_product_catalog(&self) -> Result<Vec<ProductSku>> {
        self.get_json(&["data", "products.json"]).await
    }

    async fn fetch_users(&self) -> Result<Vec<User>> {
        self.get_json(&["data", "users.json"]).await
    }

    async fn fetch_stores(&self) -> Result<Vec<Store>> {
        self.get_json(&["data", "stores.json"]).await
    }

    async fn fetch_spoilage(&self, store_name: &str) -> Result<Vec<SpoilageRecord>> {
        self.get_json(&["api", "spoilage-data", store_name]).await
    }

    async fn fetch_order_history(&self, store_name: &str) -> Result<Vec<OrderHistoryEntry>> {
        self.get_json(&["api", "order-history", store_name]).await
    }

    async fn fetch_notifications(&self, store_name: &str) -> Result<Vec<Notification>> {
        self.get_json(&["api", "notifications", store_name]).await
    }

    async fn fetch_regional_performance(&self, region: &str) -> Result<Vec<RegionalStorePerformance>> {
        self.get_json(&["api", "regional-performance", region]).await
    }

    async fn fetch_corporate_dashboard(&self) -> Result<CorporateDashboard> {
        self.get_json(&["api", "corporate-dashboard"]).await
    }
}

pub mod fixture;
pub mod http;
pub mod types;

use crate::catalog::{ProductSku, Store, User};
use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use types::{
    CorporateDashboard, Notification, OrderHistoryEntry, RecommendationRecord,
    RegionalStorePerformance, SpoilageRecord,
};

/// Where the dashboard's data comes from. Implementations report transport
/// and decoding failures as errors; callers decide how to degrade (see [`soft`]).
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_recommendations(&self, store_name: &str) -> Result<Vec<RecommendationRecord>>;
    async fn fetch_justification_reasons(&self) -> Result<Vec<String>>;
    async fn fetch_product_catalog(&self) -> Result<Vec<ProductSku>>;
    async fn fetch_users(&self) -> Result<Vec<User>>;
    async fn fetch_stores(&self) -> Result<Vec<Store>>;
    async fn fetch_spoilage(&self, store_name: &str) -> Result<Vec<SpoilageRecord>>;
    async fn fetch_order_history(&self, store_name: &str) -> Result<Vec<OrderHistoryEntry>>;
    async fn fetch_notifications(&self, store_name: &str) -> Result<Vec<Notification>>;
    async fn fetch_regional_performance(&self, region: &str) -> Result<Vec<RegionalStorePerformance>>;
    async fn fetch_corporate_dashboard(&self) -> Result<CorporateDashboard>;
}

/// Result of a fetch that never fails: the data (or its fallback) plus a
/// message for the user when the fallback was used.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    pub data: T,
    pub error: Option<String>,
}

impl<T> FetchOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Await a fetch and fall back to `T::default()` on error. The error is logged
/// and turned into a user-facing message built from `what`.
pub async fn soft<T, F>(what: &str, fetch: F) -> FetchOutcome<T>
where
    T: Default,
    F: Future<Output = Result<T>>,
{
    match fetch.await {
        Ok(data) => FetchOutcome::ok(data),
        Err(e) => {
            tracing::error!(what, error = %format!("{:#}", e), "fetch failed, using empty fallback");
            FetchOutcome {
                data: T::default(),
                error: Some(format!("Failed to fetch {}.", what)),
            }
        }
    }
}

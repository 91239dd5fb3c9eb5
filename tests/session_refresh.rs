// Refresh sequencing and degraded fetches through the review session

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use grocer_review::catalog::{Catalog, ProductSku, Store, User};
use grocer_review::engine::{QuantityInputPolicy, ReviewStatus};
use grocer_review::feed::fixture::FixtureSource;
use grocer_review::feed::types::*;
use grocer_review::feed::DataSource;
use grocer_review::session::{LoadState, ReviewSession};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const STORE: &str = "GreenGrocer Downtown";

fn record(sku: &str, qty: i64) -> RecommendationRecord {
    RecommendationRecord {
        sku: sku.to_string(),
        product_name: sku.to_string(),
        current_inventory: 5,
        forecasted_qty: 15,
        recommended_qty: qty,
        target_delivery_date: NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
    }
}

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::with_products(vec![ProductSku {
        sku: "PROD-001".to_string(),
        name: "Organic Bananas".to_string(),
        category: "Produce".to_string(),
        unit_of_measure: "lb".to_string(),
    }]))
}

/// Serves a slow first batch and fast later ones.
struct SlowThenFast {
    calls: AtomicUsize,
}

#[async_trait]
impl DataSource for SlowThenFast {
    async fn fetch_recommendations(&self, _store_name: &str) -> Result<Vec<RecommendationRecord>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(vec![record("OLD-001", 1)])
        } else {
            Ok(vec![record("PROD-001", 20)])
        }
    }
    async fn fetch_justification_reasons(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
    async fn fetch_product_catalog(&self) -> Result<Vec<ProductSku>> {
        Ok(Vec::new())
    }
    async fn fetch_users(&self) -> Result<Vec<User>> {
        Ok(Vec::new())
    }
    async fn fetch_stores(&self) -> Result<Vec<Store>> {
        Ok(Vec::new())
    }
    async fn fetch_spoilage(&self, _store_name: &str) -> Result<Vec<SpoilageRecord>> {
        Ok(Vec::new())
    }
    async fn fetch_order_history(&self, _store_name: &str) -> Result<Vec<OrderHistoryEntry>> {
        Ok(Vec::new())
    }
    async fn fetch_notifications(&self, _store_name: &str) -> Result<Vec<Notification>> {
        Ok(Vec::new())
    }
    async fn fetch_regional_performance(&self, _region: &str) -> Result<Vec<RegionalStorePerformance>> {
        Ok(Vec::new())
    }
    async fn fetch_corporate_dashboard(&self) -> Result<CorporateDashboard> {
        Ok(CorporateDashboard::default())
    }
}

/// Backend that is down.
struct Unavailable;

#[async_trait]
impl DataSource for Unavailable {
    async fn fetch_recommendations(&self, _store_name: &str) -> Result<Vec<RecommendationRecord>> {
        bail!("GET /api/order-recommendations failed (503 Service Unavailable)")
    }
    async fn fetch_justification_reasons(&self) -> Result<Vec<String>> {
        bail!("down")
    }
    async fn fetch_product_catalog(&self) -> Result<Vec<ProductSku>> {
        bail!("down")
    }
    async fn fetch_users(&self) -> Result<Vec<User>> {
        bail!("down")
    }
    async fn fetch_stores(&self) -> Result<Vec<Store>> {
        bail!("down")
    }
    async fn fetch_spoilage(&self, _store_name: &str) -> Result<Vec<SpoilageRecord>> {
        bail!("down")
    }
    async fn fetch_order_history(&self, _store_name: &str) -> Result<Vec<OrderHistoryEntry>> {
        bail!("down")
    }
    async fn fetch_notifications(&self, _store_name: &str) -> Result<Vec<Notification>> {
        bail!("down")
    }
    async fn fetch_regional_performance(&self, _region: &str) -> Result<Vec<RegionalStorePerformance>> {
        bail!("down")
    }
    async fn fetch_corporate_dashboard(&self) -> Result<CorporateDashboard> {
        bail!("down")
    }
}

#[tokio::test]
async fn test_stale_refresh_never_replaces_newer_batch() {
    let source: Arc<dyn DataSource> = Arc::new(SlowThenFast {
        calls: AtomicUsize::new(0),
    });
    let mut session = ReviewSession::new(catalog(), STORE, QuantityInputPolicy::Reject);

    // Hand-sequence two in-flight fetches so both results arrive.
    let first = session.begin_refresh();
    let slow = {
        let source = source.clone();
        tokio::spawn(async move { source.fetch_recommendations(STORE).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(session.refresh(source.as_ref()).await);
    assert!(session.engine().get("PROD-001").is_some());

    let late = slow.await.unwrap().unwrap();
    let installed = session.apply(grocer_review::session::BatchLoaded {
        generation: first,
        store: STORE.to_string(),
        outcome: grocer_review::feed::FetchOutcome::ok(late),
    });
    assert!(!installed);
    assert!(session.engine().get("PROD-001").is_some());
    assert!(session.engine().get("OLD-001").is_none());
}

#[tokio::test]
async fn test_spawned_refresh_replaces_in_flight_one() {
    let source: Arc<dyn DataSource> = Arc::new(SlowThenFast {
        calls: AtomicUsize::new(0),
    });
    let (tx, mut rx) = mpsc::channel(4);
    let mut session = ReviewSession::new(catalog(), STORE, QuantityInputPolicy::Reject);

    session.spawn_refresh(source.clone(), tx.clone());
    tokio::time::sleep(Duration::from_millis(20)).await;
    session.spawn_refresh(source, tx);

    let loaded = rx.recv().await.unwrap();
    assert_eq!(loaded.generation, session.generation());
    assert!(session.apply(loaded));
    assert_eq!(session.state(), LoadState::Ready);
    assert!(session.engine().get("PROD-001").is_some());
}

#[tokio::test]
async fn test_failed_fetch_yields_empty_batch_and_message() {
    let mut session = ReviewSession::new(catalog(), STORE, QuantityInputPolicy::Reject);
    assert!(session.refresh(&Unavailable).await);
    assert_eq!(session.state(), LoadState::Ready);
    assert!(session.engine().is_empty());
    assert_eq!(session.error(), Some("Failed to fetch order recommendations."));
}

#[tokio::test]
async fn test_edits_survive_until_refresh() {
    let source = FixtureSource::new().with_recommendations(STORE, vec![record("PROD-001", 20)]);
    let mut session = ReviewSession::new(catalog(), STORE, QuantityInputPolicy::CoerceToZero);
    session.refresh(&source).await;

    session.engine_mut().set_quantity_input("PROD-001", "lots").unwrap();
    assert_eq!(session.engine().get("PROD-001").unwrap().adjusted_qty(), 0);
    assert_eq!(
        session.engine().get("PROD-001").unwrap().status(),
        ReviewStatus::Adjusted
    );

    // A refresh replaces the batch wholesale.
    session.refresh(&source).await;
    assert_eq!(
        session.engine().get("PROD-001").unwrap().status(),
        ReviewStatus::PendingForReview
    );
}

#[tokio::test]
async fn test_shipped_fixtures_drive_a_session() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let source = FixtureSource::load_dir(&dir).unwrap();
    let products = source.fetch_product_catalog().await.unwrap();
    let catalog = Arc::new(Catalog::new(
        source.fetch_users().await.unwrap(),
        source.fetch_stores().await.unwrap(),
        products,
        source.fetch_justification_reasons().await.unwrap(),
    ));
    let mut session = ReviewSession::new(catalog, STORE, QuantityInputPolicy::Reject);
    assert!(session.refresh(&source).await);
    assert!(!session.engine().is_empty());
    assert!(session.error().is_none());
}

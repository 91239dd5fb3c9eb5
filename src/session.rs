use crate::catalog::Catalog;
use crate::engine::{QuantityInputPolicy, ReviewEngine};
use crate::feed::types::RecommendationRecord;
use crate::feed::{soft, DataSource, FetchOutcome};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
}

/// A finished recommendations fetch, tagged with the refresh that issued it.
#[derive(Debug, Clone)]
pub struct BatchLoaded {
    pub generation: u64,
    pub store: String,
    pub outcome: FetchOutcome<Vec<RecommendationRecord>>,
}

/// One store's review: the engine holding its batch plus load bookkeeping.
///
/// Every refresh gets a new generation number. Only a result carrying the
/// latest generation is installed, so a slow response can never overwrite a
/// batch requested after it.
pub struct ReviewSession {
    store: String,
    catalog: Arc<Catalog>,
    engine: ReviewEngine,
    generation: u64,
    state: LoadState,
    error: Option<String>,
    in_flight: Option<JoinHandle<()>>,
}

impl ReviewSession {
    pub fn new(catalog: Arc<Catalog>, store: &str, policy: QuantityInputPolicy) -> Self {
        Self {
            store: store.to_string(),
            engine: ReviewEngine::empty(catalog.clone()).with_quantity_policy(policy),
            catalog,
            generation: 0,
            state: LoadState::Idle,
            error: None,
            in_flight: None,
        }
    }

    pub fn store(&self) -> &str {
        &self.store
    }

    pub fn engine(&self) -> &ReviewEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ReviewEngine {
        &mut self.engine
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Issue a new generation. Anything still in flight becomes stale.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.generation
    }

    /// Install a fetched batch if it is current. Returns whether it was installed.
    pub fn apply(&mut self, loaded: BatchLoaded) -> bool {
        if loaded.generation != self.generation || loaded.store != self.store {
            tracing::debug!(
                store = %loaded.store,
                generation = loaded.generation,
                current = self.generation,
                "dropping stale recommendations batch"
            );
            return false;
        }

        let status_filter = self.engine.status_filter();
        let category_filter = self.engine.category_filter().clone();
        let policy = self.engine.quantity_policy();

        let mut engine = ReviewEngine::new(self.catalog.clone(), loaded.outcome.data)
            .with_quantity_policy(policy);
        engine.set_status_filter(status_filter);
        engine.set_category_filter(category_filter);

        tracing::info!(
            store = %self.store,
            generation = loaded.generation,
            items = engine.len(),
            degraded = loaded.outcome.error.is_some(),
            "recommendations batch installed"
        );

        self.engine = engine;
        self.error = loaded.outcome.error;
        self.state = LoadState::Ready;
        self.in_flight = None;
        true
    }

    /// Fetch on a tokio task and deliver the result on `tx`. A refresh still
    /// running from an earlier call is aborted.
    pub fn spawn_refresh(&mut self, source: Arc<dyn DataSource>, tx: mpsc::Sender<BatchLoaded>) {
        let generation = self.begin_refresh();
        let store = self.store.clone();
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = soft("order recommendations", source.fetch_recommendations(&store)).await;
            if tx
                .send(BatchLoaded {
                    generation,
                    store,
                    outcome,
                })
                .await
                .is_err()
            {
                tracing::debug!(generation, "refresh receiver gone");
            }
        }));
    }

    /// Fetch and install inline.
    pub async fn refresh(&mut self, source: &dyn DataSource) -> bool {
        let generation = self.begin_refresh();
        let store = self.store.clone();
        let outcome = soft("order recommendations", source.fetch_recommendations(&store)).await;
        self.apply(BatchLoaded {
            generation,
            store,
            outcome,
        })
    }

    /// Drop the current batch and start loading another store's.
    pub fn switch_store(
        &mut self,
        store: &str,
        source: Arc<dyn DataSource>,
        tx: mpsc::Sender<BatchLoaded>,
    ) {
        tracing::info!(from = %self.store, to = %store, "switching store");
        self.store = store.to_string();
        let policy = self.engine.quantity_policy();
        self.engine = ReviewEngine::empty(self.catalog.clone()).with_quantity_policy(policy);
        self.error = None;
        self.spawn_refresh(source, tx);
    }
}

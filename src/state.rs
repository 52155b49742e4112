use std::sync::Arc;
use std::time::Instant;

use crate::db::SqliteStore;
use crate::services::RecommendationService;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    store: SqliteStore,
    recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(store: SqliteStore, recommendations: RecommendationService) -> Self {
        Self {
            started_at: Instant::now(),
            store,
            recommendations: Arc::new(recommendations),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn recommendations(&self) -> Arc<RecommendationService> {
        Arc::clone(&self.recommendations)
    }

    /// Track whose modules are listed.
    pub fn track(&self) -> &str {
        &self.recommendations.options().track
    }
}

pub mod config;
pub mod db;
pub mod logging;
pub mod recommender;
pub mod response;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;

use crate::db::SqliteStore;
use crate::services::RecommendationService;
use crate::state::AppState;

pub fn create_app(store: SqliteStore, recommendations: RecommendationService) -> axum::Router {
    routes::router(AppState::new(store, recommendations))
}

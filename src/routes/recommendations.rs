use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::db::{LatestRecommendation, RecommendationSnapshot};
use crate::recommender::{RecommendationInput, RecommendationResult};
use crate::response::{ok, AppError, SuccessResponse};
use crate::state::AppState;

use super::json_body;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recommendations/preview", post(preview))
        .route(
            "/users/:user_id/recommendations",
            get(latest).post(recalculate),
        )
}

/// Runs the engine on caller-supplied signals without touching the store.
async fn preview(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationInput>, JsonRejection>,
) -> Result<Json<SuccessResponse<RecommendationResult>>, AppError> {
    let input = json_body(payload)?;
    Ok(ok(state.recommendations().engine().recommend(&input)))
}

async fn latest(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse<Option<LatestRecommendation>>>, AppError> {
    let latest = state.recommendations().latest(state.store(), &user_id).await?;
    Ok(ok(latest))
}

async fn recalculate(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse<RecommendationSnapshot>>, AppError> {
    let snapshot = state
        .recommendations()
        .calculate_and_store(state.store(), &user_id, Utc::now())
        .await?;
    Ok(ok(snapshot))
}

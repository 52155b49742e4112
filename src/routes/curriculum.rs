use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::response::{ok, AppError, SuccessResponse};
use crate::services::curriculum::{self, ModuleDetail, ModuleSummary};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/modules", get(list_modules))
        .route("/users/:user_id/modules/:slug", get(module_detail))
}

async fn list_modules(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse<Vec<ModuleSummary>>>, AppError> {
    let modules = curriculum::module_summaries(state.store(), &user_id, state.track()).await?;
    Ok(ok(modules))
}

async fn module_detail(
    State(state): State<AppState>,
    Path((user_id, slug)): Path<(String, String)>,
) -> Result<Json<SuccessResponse<ModuleDetail>>, AppError> {
    let detail = curriculum::module_detail(state.store(), &slug, &user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("module {slug} not found")))?;
    Ok(ok(detail))
}

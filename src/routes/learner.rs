use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::{AttemptResult, LearnerProfile, ProgressStatus};
use crate::response::{ok, AppError, SuccessResponse};
use crate::services::quiz::QuizSubmission;
use crate::services::{exercise, profile, progress, quiz};
use crate::state::AppState;

use super::json_body;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/profile", get(get_profile).put(update_profile))
        .route("/users/:user_id/progress", put(update_progress))
        .route("/users/:user_id/quizzes/:lesson_id", post(submit_quiz))
        .route("/users/:user_id/exercise-attempts", post(record_exercise_attempt))
        .route("/users/:user_id/streak", get(streak))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileBody {
    goals: Vec<String>,
    weekly_time_commitment_h: u32,
}

async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse<Option<LearnerProfile>>>, AppError> {
    let profile = state.store().profile(&user_id).await?;
    Ok(ok(profile))
}

/// Onboarding answers feeding goal overlap and the weekly time note.
async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<ProfileBody>, JsonRejection>,
) -> Result<Json<SuccessResponse<LearnerProfile>>, AppError> {
    let body = json_body(payload)?;
    let learner = profile::validate_profile(&user_id, body.goals, body.weekly_time_commitment_h)
        .map_err(|err| AppError::validation(err.to_string()))?;

    state.store().upsert_profile(&learner).await?;
    tracing::debug!(user_id = %user_id, goals = learner.goals.len(), "profile updated");
    Ok(ok(learner))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressBody {
    lesson_id: String,
    status: String,
    percent: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressData {
    lesson_id: String,
    status: ProgressStatus,
    percent: u32,
}

async fn update_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<ProgressBody>, JsonRejection>,
) -> Result<Json<SuccessResponse<ProgressData>>, AppError> {
    let body = json_body(payload)?;
    let status = ProgressStatus::parse(&body.status)
        .ok_or_else(|| AppError::validation(format!("invalid status: {}", body.status)))?;

    if !state.store().lesson_exists(&body.lesson_id).await? {
        return Err(AppError::not_found(format!("lesson {} not found", body.lesson_id)));
    }

    let percent = body.percent.min(100);
    progress::record_progress(state.store(), &user_id, &body.lesson_id, status, percent, Utc::now())
        .await?;

    Ok(ok(ProgressData {
        lesson_id: body.lesson_id,
        status,
        percent,
    }))
}

#[derive(Debug, Deserialize)]
struct QuizBody {
    #[serde(default)]
    answers: HashMap<String, String>,
}

async fn submit_quiz(
    State(state): State<AppState>,
    Path((user_id, lesson_id)): Path<(String, String)>,
    payload: Result<Json<QuizBody>, JsonRejection>,
) -> Result<Json<SuccessResponse<QuizSubmission>>, AppError> {
    let body = json_body(payload)?;
    if !state.store().lesson_exists(&lesson_id).await? {
        return Err(AppError::not_found(format!("lesson {lesson_id} not found")));
    }

    let submission =
        quiz::submit_quiz(state.store(), &user_id, &lesson_id, &body.answers, Utc::now()).await?;
    Ok(ok(submission))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseAttemptBody {
    exercise_id: String,
    result: String,
    #[serde(default)]
    feedback: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseAttemptData {
    id: String,
    exercise_id: String,
    result: AttemptResult,
}

async fn record_exercise_attempt(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<ExerciseAttemptBody>, JsonRejection>,
) -> Result<Json<SuccessResponse<ExerciseAttemptData>>, AppError> {
    let body = json_body(payload)?;
    let result = AttemptResult::parse(&body.result)
        .ok_or_else(|| AppError::validation(format!("invalid result: {}", body.result)))?;

    let id = exercise::record_attempt(
        state.store(),
        &user_id,
        &body.exercise_id,
        result,
        &body.feedback,
        Utc::now(),
    )
    .await?
    .ok_or_else(|| AppError::not_found(format!("exercise {} not found", body.exercise_id)))?;

    Ok(ok(ExerciseAttemptData {
        id,
        exercise_id: body.exercise_id,
        result,
    }))
}

#[derive(Debug, Serialize)]
struct StreakData {
    streak: u32,
}

async fn streak(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse<StreakData>>, AppError> {
    let streak = progress::current_streak(state.store(), &user_id, Utc::now()).await?;
    Ok(ok(StreakData { streak }))
}

use chrono::{DateTime, Utc};

use crate::db::learner::NewExerciseAttempt;
use crate::db::{AttemptResult, SqliteStore, StoreError};

/// Stores an attempt. Returns `None` when the exercise is unknown.
pub async fn record_attempt(
    store: &SqliteStore,
    user_id: &str,
    exercise_id: &str,
    result: AttemptResult,
    feedback: &str,
    now: DateTime<Utc>,
) -> Result<Option<String>, StoreError> {
    if !store.exercise_exists(exercise_id).await? {
        return Ok(None);
    }

    let id = store
        .insert_exercise_attempt(
            NewExerciseAttempt {
                user_id,
                exercise_id,
                result,
                feedback,
            },
            now,
        )
        .await?;

    if !result.is_pass() {
        tracing::debug!(user_id, exercise_id, result = result.as_str(), "exercise attempt failed");
    }
    Ok(Some(id))
}

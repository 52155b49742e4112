use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::models::{
    millis_to_datetime, AttemptResult, ExerciseAttemptRecord, LearnerProfile, ProgressStatus,
    QuizAttemptRecord,
};
use super::{parse_string_list, SqliteStore, StoreError};

const STREAK_COMPLETION_WINDOW: i64 = 30;

#[derive(Debug, Clone)]
pub struct NewQuizAttempt<'a> {
    pub user_id: &'a str,
    pub lesson_id: &'a str,
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub answers: &'a serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct NewExerciseAttempt<'a> {
    pub user_id: &'a str,
    pub exercise_id: &'a str,
    pub result: AttemptResult,
    pub feedback: &'a str,
}

impl SqliteStore {
    pub async fn upsert_profile(&self, profile: &LearnerProfile) -> Result<(), StoreError> {
        let goals = serde_json::to_string(&profile.goals)?;
        sqlx::query(
            r#"
            INSERT INTO "profiles" ("userId","goals","weeklyTimeCommitmentH")
            VALUES (?, ?, ?)
            ON CONFLICT("userId") DO UPDATE SET
                "goals" = excluded."goals",
                "weeklyTimeCommitmentH" = excluded."weeklyTimeCommitmentH"
            "#,
        )
        .bind(&profile.user_id)
        .bind(&goals)
        .bind(profile.weekly_time_commitment_h.map(i64::from))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn profile(&self, user_id: &str) -> Result<Option<LearnerProfile>, StoreError> {
        let row = sqlx::query(
            r#"SELECT "userId","goals","weeklyTimeCommitmentH" FROM "profiles" WHERE "userId" = ?"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };

        let goals: String = row.try_get("goals")?;
        let weekly: Option<i64> = row.try_get("weeklyTimeCommitmentH")?;

        Ok(Some(LearnerProfile {
            user_id: row.try_get("userId")?,
            goals: parse_string_list(&goals)?,
            weekly_time_commitment_h: weekly.and_then(|h| u32::try_from(h).ok()),
        }))
    }

    /// Records progress for a lesson. `completedAt` is set only for
    /// `COMPLETED` and cleared otherwise; percent is clamped to 0..=100.
    pub async fn upsert_progress(
        &self,
        user_id: &str,
        lesson_id: &str,
        status: ProgressStatus,
        percent: u32,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let now_ms = now.timestamp_millis();
        let completed_at = (status == ProgressStatus::Completed).then_some(now_ms);

        sqlx::query(
            r#"
            INSERT INTO "progress" ("userId","lessonId","status","percent","lastSeenAt","completedAt")
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT("userId","lessonId") DO UPDATE SET
                "status" = excluded."status",
                "percent" = excluded."percent",
                "lastSeenAt" = excluded."lastSeenAt",
                "completedAt" = excluded."completedAt"
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(status.as_str())
        .bind(i64::from(percent.min(100)))
        .bind(now_ms)
        .bind(completed_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id, lesson_id, status = status.as_str(), "progress updated");
        Ok(())
    }

    /// Completion timestamps of the most recent completed lessons, newest first.
    pub async fn recent_completions(&self, user_id: &str) -> Result<Vec<DateTime<Utc>>, StoreError> {
        let rows: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT "completedAt" FROM "progress"
            WHERE "userId" = ? AND "status" = 'COMPLETED' AND "completedAt" IS NOT NULL
            ORDER BY "completedAt" DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(STREAK_COMPLETION_WINDOW)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(millis_to_datetime).collect())
    }

    pub async fn insert_quiz_attempt(
        &self,
        attempt: NewQuizAttempt<'_>,
        now: DateTime<Utc>,
    ) -> Result<QuizAttemptRecord, StoreError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO "quiz_attempts" ("id","userId","lessonId","score","maxScore","passed","answers","createdAt")
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(attempt.user_id)
        .bind(attempt.lesson_id)
        .bind(i64::from(attempt.score))
        .bind(i64::from(attempt.max_score))
        .bind(attempt.passed)
        .bind(attempt.answers.to_string())
        .bind(now.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(QuizAttemptRecord {
            id,
            user_id: attempt.user_id.to_string(),
            lesson_id: attempt.lesson_id.to_string(),
            score: attempt.score,
            max_score: attempt.max_score,
            passed: attempt.passed,
            created_at: millis_to_datetime(now.timestamp_millis()),
        })
    }

    /// All quiz attempts of a user, newest first.
    pub async fn quiz_attempts(&self, user_id: &str) -> Result<Vec<QuizAttemptRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "id","userId","lessonId","score","maxScore","passed","createdAt"
            FROM "quiz_attempts" WHERE "userId" = ?
            ORDER BY "createdAt" DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<QuizAttemptRecord, StoreError> {
                let score: i64 = row.try_get("score")?;
                let max_score: i64 = row.try_get("maxScore")?;
                Ok(QuizAttemptRecord {
                    id: row.try_get("id")?,
                    user_id: row.try_get("userId")?,
                    lesson_id: row.try_get("lessonId")?,
                    score: non_negative(score, "score")?,
                    max_score: non_negative(max_score, "maxScore")?,
                    passed: row.try_get("passed")?,
                    created_at: millis_to_datetime(row.try_get("createdAt")?),
                })
            })
            .collect()
    }

    pub async fn insert_exercise_attempt(
        &self,
        attempt: NewExerciseAttempt<'_>,
        now: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO "exercise_attempts" ("id","userId","exerciseId","result","feedback","createdAt")
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(attempt.user_id)
        .bind(attempt.exercise_id)
        .bind(attempt.result.as_str())
        .bind(attempt.feedback)
        .bind(now.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Exercise attempts of a user joined to their lesson, newest first.
    /// Attempts on unknown exercises are skipped.
    pub async fn exercise_attempts(&self, user_id: &str) -> Result<Vec<ExerciseAttemptRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT a."id", a."userId", a."exerciseId", e."lessonId", a."result", a."feedback", a."createdAt"
            FROM "exercise_attempts" a
            JOIN "exercises" e ON e."id" = a."exerciseId"
            WHERE a."userId" = ?
            ORDER BY a."createdAt" DESC, a.rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ExerciseAttemptRecord, StoreError> {
                let result: String = row.try_get("result")?;
                Ok(ExerciseAttemptRecord {
                    id: row.try_get("id")?,
                    user_id: row.try_get("userId")?,
                    exercise_id: row.try_get("exerciseId")?,
                    lesson_id: row.try_get("lessonId")?,
                    result: AttemptResult::parse(&result).ok_or_else(|| {
                        StoreError::InvalidData(format!("unknown attempt result: {result}"))
                    })?,
                    feedback: row.try_get("feedback")?,
                    created_at: millis_to_datetime(row.try_get("createdAt")?),
                })
            })
            .collect()
    }

    pub async fn exercise_exists(&self, exercise_id: &str) -> Result<bool, StoreError> {
        let found: Option<String> = sqlx::query_scalar(r#"SELECT "id" FROM "exercises" WHERE "id" = ?"#)
            .bind(exercise_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

fn non_negative(value: i64, column: &str) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::InvalidData(format!("{column} out of range: {value}")))
}

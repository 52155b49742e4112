use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::models::{millis_to_datetime, EntityRef, LatestRecommendation, RecommendationSnapshot};
use super::{SqliteStore, StoreError};
use crate::recommender::{PathStep, RecommendationResult};

impl SqliteStore {
    /// Persists an immutable snapshot of one recommendation computation.
    pub async fn insert_snapshot(
        &self,
        user_id: &str,
        result: &RecommendationResult,
        now: DateTime<Utc>,
    ) -> Result<RecommendationSnapshot, StoreError> {
        let id = Uuid::new_v4().to_string();
        let created_at = now.timestamp_millis();
        let path = serde_json::to_string(&result.personalized_path)?;

        sqlx::query(
            r#"
            INSERT INTO "recommendation_snapshots" ("id","userId","lessonId","moduleId","reason","personalizedPath","createdAt")
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(result.lesson_id.as_deref())
        .bind(result.module_id.as_deref())
        .bind(&result.reason)
        .bind(&path)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(RecommendationSnapshot {
            id,
            user_id: user_id.to_string(),
            lesson_id: result.lesson_id.clone(),
            module_id: result.module_id.clone(),
            reason: result.reason.clone(),
            personalized_path: result.personalized_path.clone(),
            created_at: millis_to_datetime(created_at),
        })
    }

    /// Newest snapshot for `user_id`, with the lesson and module it points at
    /// when they still exist.
    pub async fn latest_snapshot(&self, user_id: &str) -> Result<Option<LatestRecommendation>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT s."id", s."userId", s."lessonId", s."moduleId", s."reason",
                   s."personalizedPath", s."createdAt",
                   l."slug" AS "lessonSlug", l."title" AS "lessonTitle",
                   m."slug" AS "moduleSlug", m."title" AS "moduleTitle"
            FROM "recommendation_snapshots" s
            LEFT JOIN "lessons" l ON l."id" = s."lessonId"
            LEFT JOIN "modules" m ON m."id" = s."moduleId"
            WHERE s."userId" = ?
            ORDER BY s."createdAt" DESC, s.rowid DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };

        let path: String = row.try_get("personalizedPath")?;
        let personalized_path: Vec<PathStep> = serde_json::from_str(&path)?;
        let lesson_id: Option<String> = row.try_get("lessonId")?;
        let module_id: Option<String> = row.try_get("moduleId")?;

        let lesson = entity_ref(
            lesson_id.as_deref(),
            row.try_get("lessonSlug")?,
            row.try_get("lessonTitle")?,
        );
        let module = entity_ref(
            module_id.as_deref(),
            row.try_get("moduleSlug")?,
            row.try_get("moduleTitle")?,
        );

        Ok(Some(LatestRecommendation {
            snapshot: RecommendationSnapshot {
                id: row.try_get("id")?,
                user_id: row.try_get("userId")?,
                lesson_id,
                module_id,
                reason: row.try_get("reason")?,
                personalized_path,
                created_at: millis_to_datetime(row.try_get("createdAt")?),
            },
            lesson,
            module,
        }))
    }
}

fn entity_ref(id: Option<&str>, slug: Option<String>, title: Option<String>) -> Option<EntityRef> {
    Some(EntityRef {
        id: id?.to_string(),
        slug: slug?,
        title: title?,
    })
}

use std::collections::HashMap;

use sqlx::Row;

use super::models::{
    CandidateLesson, EntityRef, ExerciseRecord, LessonProgress, LessonRecord, ModuleLessonRow,
    ModuleRecord, ProgressStatus, QuizQuestion,
};
use super::{parse_string_list, SqliteStore, StoreError};

impl SqliteStore {
    pub async fn upsert_module(&self, module: &ModuleRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO "modules" ("id","slug","title","description","orderIndex","published","comingSoon","track")
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT("id") DO UPDATE SET
                "slug" = excluded."slug",
                "title" = excluded."title",
                "description" = excluded."description",
                "orderIndex" = excluded."orderIndex",
                "published" = excluded."published",
                "comingSoon" = excluded."comingSoon",
                "track" = excluded."track"
            "#,
        )
        .bind(&module.id)
        .bind(&module.slug)
        .bind(&module.title)
        .bind(&module.description)
        .bind(module.order_index)
        .bind(module.published)
        .bind(module.coming_soon)
        .bind(&module.track)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts or replaces a lesson together with its prerequisite edges.
    pub async fn upsert_lesson(&self, lesson: &LessonRecord) -> Result<(), StoreError> {
        let tags = serde_json::to_string(&lesson.tags)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO "lessons" ("id","moduleId","slug","title","summary","orderIndex","estimatedMinutes","difficulty","tags","published")
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT("id") DO UPDATE SET
                "moduleId" = excluded."moduleId",
                "slug" = excluded."slug",
                "title" = excluded."title",
                "summary" = excluded."summary",
                "orderIndex" = excluded."orderIndex",
                "estimatedMinutes" = excluded."estimatedMinutes",
                "difficulty" = excluded."difficulty",
                "tags" = excluded."tags",
                "published" = excluded."published"
            "#,
        )
        .bind(&lesson.id)
        .bind(&lesson.module_id)
        .bind(&lesson.slug)
        .bind(&lesson.title)
        .bind(&lesson.summary)
        .bind(lesson.order_index)
        .bind(lesson.estimated_minutes)
        .bind(lesson.difficulty)
        .bind(&tags)
        .bind(lesson.published)
        .execute(&mut *tx)
        .await?;

        sqlx::query(r#"DELETE FROM "lesson_prerequisites" WHERE "lessonId" = ?"#)
            .bind(&lesson.id)
            .execute(&mut *tx)
            .await?;

        for prerequisite in &lesson.prerequisites {
            sqlx::query(
                r#"INSERT OR IGNORE INTO "lesson_prerequisites" ("lessonId","prerequisiteLessonId") VALUES (?, ?)"#,
            )
            .bind(&lesson.id)
            .bind(prerequisite)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn upsert_exercise(&self, exercise: &ExerciseRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO "exercises" ("id","lessonId","title","orderIndex")
            VALUES (?, ?, ?, ?)
            ON CONFLICT("id") DO UPDATE SET
                "lessonId" = excluded."lessonId",
                "title" = excluded."title",
                "orderIndex" = excluded."orderIndex"
            "#,
        )
        .bind(&exercise.id)
        .bind(&exercise.lesson_id)
        .bind(&exercise.title)
        .bind(exercise.order_index)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn upsert_quiz_question(&self, question: &QuizQuestion) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO "quiz_questions" ("id","lessonId","prompt","correctAnswer","explanation","orderIndex")
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT("id") DO UPDATE SET
                "lessonId" = excluded."lessonId",
                "prompt" = excluded."prompt",
                "correctAnswer" = excluded."correctAnswer",
                "explanation" = excluded."explanation",
                "orderIndex" = excluded."orderIndex"
            "#,
        )
        .bind(&question.id)
        .bind(&question.lesson_id)
        .bind(&question.prompt)
        .bind(&question.correct_answer)
        .bind(&question.explanation)
        .bind(question.order_index)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn quiz_questions(&self, lesson_id: &str) -> Result<Vec<QuizQuestion>, StoreError> {
        let rows = sqlx::query(
            r#"SELECT "id","lessonId","prompt","correctAnswer","explanation","orderIndex"
               FROM "quiz_questions" WHERE "lessonId" = ? ORDER BY "orderIndex" ASC"#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<QuizQuestion, StoreError> {
                Ok(QuizQuestion {
                    id: row.try_get("id")?,
                    lesson_id: row.try_get("lessonId")?,
                    prompt: row.try_get("prompt")?,
                    correct_answer: row.try_get("correctAnswer")?,
                    explanation: row.try_get("explanation")?,
                    order_index: row.try_get("orderIndex")?,
                })
            })
            .collect()
    }

    pub async fn lesson_exists(&self, lesson_id: &str) -> Result<bool, StoreError> {
        let found: Option<String> = sqlx::query_scalar(r#"SELECT "id" FROM "lessons" WHERE "id" = ?"#)
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Published lessons of published modules in `track`, in curriculum order,
    /// joined with `user_id`'s progress.
    pub async fn candidate_lessons(
        &self,
        user_id: &str,
        track: &str,
    ) -> Result<Vec<CandidateLesson>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT l."id", l."title", l."moduleId", l."tags", p."status", p."percent"
            FROM "lessons" l
            JOIN "modules" m ON m."id" = l."moduleId"
            LEFT JOIN "progress" p ON p."lessonId" = l."id" AND p."userId" = ?
            WHERE l."published" = 1 AND m."published" = 1 AND m."track" = ?
            ORDER BY m."orderIndex" ASC, l."orderIndex" ASC
            "#,
        )
        .bind(user_id)
        .bind(track)
        .fetch_all(&self.pool)
        .await?;

        let mut prerequisites = self.prerequisite_map().await?;

        rows.iter()
            .map(|row| -> Result<CandidateLesson, StoreError> {
                let id: String = row.try_get("id")?;
                let tags: String = row.try_get("tags")?;
                Ok(CandidateLesson {
                    prerequisites: prerequisites.remove(&id).unwrap_or_default(),
                    title: row.try_get("title")?,
                    module_id: row.try_get("moduleId")?,
                    tags: parse_string_list(&tags)?,
                    progress: progress_from_columns(
                        row.try_get("status")?,
                        row.try_get("percent")?,
                    ),
                    id,
                })
            })
            .collect()
    }

    /// Published modules of `track` ordered by `orderIndex`, each with its
    /// lessons' progress for `user_id`.
    pub async fn modules_with_progress(
        &self,
        user_id: &str,
        track: &str,
    ) -> Result<Vec<(ModuleRecord, Vec<Option<LessonProgress>>)>, StoreError> {
        let modules = sqlx::query(
            r#"SELECT "id","slug","title","description","orderIndex","published","comingSoon","track"
               FROM "modules" WHERE "published" = 1 AND "track" = ? ORDER BY "orderIndex" ASC"#,
        )
        .bind(track)
        .fetch_all(&self.pool)
        .await?;

        let lesson_rows = sqlx::query(
            r#"
            SELECT l."moduleId", p."status", p."percent"
            FROM "lessons" l
            LEFT JOIN "progress" p ON p."lessonId" = l."id" AND p."userId" = ?
            ORDER BY l."orderIndex" ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_module: HashMap<String, Vec<Option<LessonProgress>>> = HashMap::new();
        for row in &lesson_rows {
            let module_id: String = row.try_get("moduleId")?;
            by_module
                .entry(module_id)
                .or_default()
                .push(progress_from_columns(row.try_get("status")?, row.try_get("percent")?));
        }

        modules
            .iter()
            .map(|row| -> Result<_, StoreError> {
                let module = module_from_row(row)?;
                let lessons = by_module.remove(&module.id).unwrap_or_default();
                Ok((module, lessons))
            })
            .collect()
    }

    pub async fn module_by_slug(&self, slug: &str) -> Result<Option<ModuleRecord>, StoreError> {
        let row = sqlx::query(
            r#"SELECT "id","slug","title","description","orderIndex","published","comingSoon","track"
               FROM "modules" WHERE "slug" = ?"#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(module_from_row).transpose()
    }

    /// Lessons of one module in `orderIndex` order, with prerequisites and
    /// `user_id`'s progress.
    pub async fn module_lessons(
        &self,
        module_id: &str,
        user_id: &str,
    ) -> Result<Vec<ModuleLessonRow>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT l."id", l."slug", l."title", l."summary", l."orderIndex",
                   l."estimatedMinutes", l."difficulty", p."status", p."percent"
            FROM "lessons" l
            LEFT JOIN "progress" p ON p."lessonId" = l."id" AND p."userId" = ?
            WHERE l."moduleId" = ?
            ORDER BY l."orderIndex" ASC
            "#,
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        let prerequisite_rows = sqlx::query(
            r#"
            SELECT lp."lessonId", lp."prerequisiteLessonId", pl."slug", pl."title"
            FROM "lesson_prerequisites" lp
            JOIN "lessons" l ON l."id" = lp."lessonId"
            LEFT JOIN "lessons" pl ON pl."id" = lp."prerequisiteLessonId"
            WHERE l."moduleId" = ?
            ORDER BY lp.rowid ASC
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        let mut prerequisites: HashMap<String, Vec<EntityRef>> = HashMap::new();
        for row in &prerequisite_rows {
            let lesson_id: String = row.try_get("lessonId")?;
            let id: String = row.try_get("prerequisiteLessonId")?;
            let slug: Option<String> = row.try_get("slug")?;
            let title: Option<String> = row.try_get("title")?;
            prerequisites.entry(lesson_id).or_default().push(EntityRef {
                slug: slug.unwrap_or_else(|| id.clone()),
                title: title.unwrap_or_default(),
                id,
            });
        }

        rows.iter()
            .map(|row| -> Result<ModuleLessonRow, StoreError> {
                let id: String = row.try_get("id")?;
                Ok(ModuleLessonRow {
                    prerequisites: prerequisites.remove(&id).unwrap_or_default(),
                    slug: row.try_get("slug")?,
                    title: row.try_get("title")?,
                    summary: row.try_get("summary")?,
                    order_index: row.try_get("orderIndex")?,
                    estimated_minutes: row.try_get("estimatedMinutes")?,
                    difficulty: row.try_get("difficulty")?,
                    progress: progress_from_columns(
                        row.try_get("status")?,
                        row.try_get("percent")?,
                    ),
                    id,
                })
            })
            .collect()
    }

    /// Completed lesson ids for `user_id`, across all modules.
    pub async fn completed_lesson_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let ids = sqlx::query_scalar(
            r#"SELECT "lessonId" FROM "progress" WHERE "userId" = ? AND "status" = 'COMPLETED'"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn prerequisite_map(&self) -> Result<HashMap<String, Vec<String>>, StoreError> {
        let rows = sqlx::query(
            r#"SELECT "lessonId","prerequisiteLessonId" FROM "lesson_prerequisites" ORDER BY rowid ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for row in &rows {
            let lesson_id: String = row.try_get("lessonId")?;
            let prerequisite: String = row.try_get("prerequisiteLessonId")?;
            map.entry(lesson_id).or_default().push(prerequisite);
        }
        Ok(map)
    }
}

fn module_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ModuleRecord, StoreError> {
    Ok(ModuleRecord {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        order_index: row.try_get("orderIndex")?,
        published: row.try_get("published")?,
        coming_soon: row.try_get("comingSoon")?,
        track: row.try_get("track")?,
    })
}

fn progress_from_columns(status: Option<String>, percent: Option<i64>) -> Option<LessonProgress> {
    let status = status?;
    Some(LessonProgress {
        status: ProgressStatus::parse(&status).unwrap_or_default(),
        percent: percent.unwrap_or(0).clamp(0, 100) as u32,
    })
}

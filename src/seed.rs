//! Curriculum loading from a JSON document.
//!
//! Every record is upserted by id, so loading the same file again updates
//! content in place and never duplicates it. Learner data is never touched.

use std::path::Path;

use serde::Deserialize;

use crate::db::{ExerciseRecord, LessonRecord, ModuleRecord, QuizQuestion, SqliteStore, StoreError};

const DEFAULT_TRACK: &str = "WEB";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("cannot read curriculum file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed curriculum: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid curriculum: {0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumSeed {
    /// Track for modules that do not name one.
    #[serde(default)]
    pub track: Option<String>,
    pub modules: Vec<SeedModule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedModule {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order_index: i64,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default)]
    pub coming_soon: bool,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default)]
    pub lessons: Vec<SeedLesson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedLesson {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub order_index: i64,
    #[serde(default = "default_minutes")]
    pub estimated_minutes: i64,
    #[serde(default = "default_difficulty")]
    pub difficulty: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub exercises: Vec<SeedExercise>,
    #[serde(default)]
    pub quiz_questions: Vec<SeedQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedExercise {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub order_index: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedQuestion {
    pub id: String,
    pub prompt: String,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub order_index: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub modules: usize,
    pub lessons: usize,
    pub exercises: usize,
    pub quiz_questions: usize,
}

fn default_true() -> bool {
    true
}

fn default_minutes() -> i64 {
    15
}

fn default_difficulty() -> i64 {
    1
}

impl CurriculumSeed {
    pub fn parse(json: &str) -> Result<Self, SeedError> {
        let seed: Self = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    fn validate(&self) -> Result<(), SeedError> {
        for module in &self.modules {
            if module.id.trim().is_empty() || module.slug.trim().is_empty() {
                return Err(SeedError::Invalid(format!("module '{}' needs an id and a slug", module.title)));
            }
            for lesson in &module.lessons {
                if lesson.id.trim().is_empty() || lesson.slug.trim().is_empty() {
                    return Err(SeedError::Invalid(format!("lesson '{}' needs an id and a slug", lesson.title)));
                }
                if lesson.prerequisites.contains(&lesson.id) {
                    return Err(SeedError::Invalid(format!("lesson {} lists itself as a prerequisite", lesson.id)));
                }
            }
        }
        Ok(())
    }
}

/// Upserts every module, lesson, exercise and quiz question in `seed`.
pub async fn apply_curriculum(store: &SqliteStore, seed: &CurriculumSeed) -> Result<SeedSummary, StoreError> {
    let default_track = seed.track.as_deref().unwrap_or(DEFAULT_TRACK);
    let mut summary = SeedSummary::default();

    for module in &seed.modules {
        store
            .upsert_module(&ModuleRecord {
                id: module.id.clone(),
                slug: module.slug.clone(),
                title: module.title.clone(),
                description: module.description.clone(),
                order_index: module.order_index,
                published: module.published,
                coming_soon: module.coming_soon,
                track: module.track.as_deref().unwrap_or(default_track).to_uppercase(),
            })
            .await?;
        summary.modules += 1;

        for lesson in &module.lessons {
            store
                .upsert_lesson(&LessonRecord {
                    id: lesson.id.clone(),
                    module_id: module.id.clone(),
                    slug: lesson.slug.clone(),
                    title: lesson.title.clone(),
                    summary: lesson.summary.clone(),
                    order_index: lesson.order_index,
                    estimated_minutes: lesson.estimated_minutes,
                    difficulty: lesson.difficulty,
                    tags: lesson.tags.clone(),
                    published: lesson.published,
                    prerequisites: lesson.prerequisites.clone(),
                })
                .await?;
            summary.lessons += 1;

            for exercise in &lesson.exercises {
                store
                    .upsert_exercise(&ExerciseRecord {
                        id: exercise.id.clone(),
                        lesson_id: lesson.id.clone(),
                        title: exercise.title.clone(),
                        order_index: exercise.order_index,
                    })
                    .await?;
                summary.exercises += 1;
            }

            for question in &lesson.quiz_questions {
                store
                    .upsert_quiz_question(&QuizQuestion {
                        id: question.id.clone(),
                        lesson_id: lesson.id.clone(),
                        prompt: question.prompt.clone(),
                        correct_answer: question.correct_answer.clone(),
                        explanation: question.explanation.clone(),
                        order_index: question.order_index,
                    })
                    .await?;
                summary.quiz_questions += 1;
            }
        }
    }

    Ok(summary)
}

pub async fn load_curriculum_file(store: &SqliteStore, path: &Path) -> Result<SeedSummary, SeedError> {
    let json = tokio::fs::read_to_string(path).await?;
    let seed = CurriculumSeed::parse(&json)?;
    Ok(apply_curriculum(store, &seed).await?)
}

/// Startup hook: loads the curriculum file when one is configured. Failures
/// are logged and the server keeps running on whatever is already stored.
pub async fn seed_curriculum(store: &SqliteStore, path: Option<&Path>) {
    let Some(path) = path else {
        tracing::debug!("no curriculum file configured, skipping seed");
        return;
    };

    match load_curriculum_file(store, path).await {
        Ok(summary) => tracing::info!(
            path = %path.display(),
            modules = summary.modules,
            lessons = summary.lessons,
            exercises = summary.exercises,
            quiz_questions = summary.quiz_questions,
            "curriculum seeded"
        ),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to seed curriculum"),
    }
}

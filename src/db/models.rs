use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommender::PathStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NOT_STARTED" => Some(Self::NotStarted),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptResult {
    Pass,
    Fail,
    Error,
}

impl AttemptResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Error => "ERROR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PASS" => Some(Self::Pass),
            "FAIL" => Some(Self::Fail),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order_index: i64,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub coming_soon: bool,
    pub track: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: String,
    pub module_id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub order_index: i64,
    pub estimated_minutes: i64,
    pub difficulty: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    /// Lesson ids.
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    pub order_index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub lesson_id: String,
    pub prompt: String,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    pub order_index: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub user_id: String,
    #[serde(default)]
    pub goals: Vec<String>,
    pub weekly_time_commitment_h: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub status: ProgressStatus,
    pub percent: u32,
}

/// A published lesson joined with one learner's progress.
#[derive(Debug, Clone)]
pub struct CandidateLesson {
    pub id: String,
    pub title: String,
    pub module_id: String,
    pub tags: Vec<String>,
    pub prerequisites: Vec<String>,
    pub progress: Option<LessonProgress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptRecord {
    pub id: String,
    pub user_id: String,
    pub lesson_id: String,
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub created_at: DateTime<Utc>,
}

impl QuizAttemptRecord {
    pub fn score_ratio(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        self.score as f64 / self.max_score as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseAttemptRecord {
    pub id: String,
    pub user_id: String,
    pub exercise_id: String,
    /// Owning lesson, resolved through the exercise.
    pub lesson_id: String,
    pub result: AttemptResult,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSnapshot {
    pub id: String,
    pub user_id: String,
    pub lesson_id: Option<String>,
    pub module_id: Option<String>,
    pub reason: String,
    pub personalized_path: Vec<PathStep>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub id: String,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestRecommendation {
    #[serde(flatten)]
    pub snapshot: RecommendationSnapshot,
    pub lesson: Option<EntityRef>,
    pub module: Option<EntityRef>,
}

/// Module row with the lessons needed to build a progress view.
#[derive(Debug, Clone)]
pub struct ModuleLessonRow {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub order_index: i64,
    pub estimated_minutes: i64,
    pub difficulty: i64,
    pub prerequisites: Vec<EntityRef>,
    pub progress: Option<LessonProgress>,
}

pub(crate) fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}

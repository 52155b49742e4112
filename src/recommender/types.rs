//! Engine input and output types.
//!
//! All types serialize camelCase so they can travel over the HTTP API
//! and into snapshot storage unchanged.

use serde::{Deserialize, Serialize};

/// Per-lesson measurements for a single learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSignal {
    pub lesson_id: String,
    pub title: String,
    /// Passed through to the result; not used for ranking.
    pub module_id: String,
    /// Position in the canonical curriculum sequence.
    pub order_index: i64,
    /// Lesson ids that must be completed first.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    /// 0..=100
    #[serde(default)]
    pub completion_percent: u32,
    /// score / maxScore of the most recent quiz attempt, 0 if none.
    #[serde(default)]
    pub quiz_score_ratio: f64,
    /// Non-passing exercise attempts.
    #[serde(default)]
    pub failed_attempts: u32,
    /// Lesson tags overlapping the learner's goals.
    #[serde(default)]
    pub goals_overlap_score: u32,
}

impl LessonSignal {
    pub fn new(lesson_id: impl Into<String>, module_id: impl Into<String>, order_index: i64) -> Self {
        let lesson_id = lesson_id.into();
        Self {
            title: lesson_id.clone(),
            lesson_id,
            module_id: module_id.into(),
            order_index,
            prerequisites: Vec::new(),
            completed: false,
            completion_percent: 0,
            quiz_score_ratio: 0.0,
            failed_attempts: 0,
            goals_overlap_score: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationInput {
    pub lessons: Vec<LessonSignal>,
    pub weekly_time_commitment_h: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStep {
    pub lesson_id: String,
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub lesson_id: Option<String>,
    pub module_id: Option<String>,
    pub reason: String,
    pub personalized_path: Vec<PathStep>,
}

impl RecommendationResult {
    pub fn is_finished(&self) -> bool {
        self.lesson_id.is_none()
    }
}

/// Which decision rule produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    UnmetPrerequisite,
    Struggling,
    NextInSequence,
    TrackComplete,
}

impl DecisionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnmetPrerequisite => "unmet_prerequisite",
            Self::Struggling => "struggling",
            Self::NextInSequence => "next_in_sequence",
            Self::TrackComplete => "track_complete",
        }
    }
}

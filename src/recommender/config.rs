use serde::{Deserialize, Serialize};

const QUIZ_WEIGHT: f64 = 0.45;
const EXERCISE_WEIGHT: f64 = 0.35;
const COMPLETION_WEIGHT: f64 = 0.20;
const STRUGGLE_PENALTY: f64 = 0.15;
const MASTERY_THRESHOLD: f64 = 0.7;
const FAILED_ATTEMPT_THRESHOLD: u32 = 3;
const FAILURE_DECAY: f64 = 0.1;
const SHORT_WEEK_HOURS: u32 = 2;

/// Scoring constants for the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationWeights {
    pub quiz_weight: f64,
    pub exercise_weight: f64,
    pub completion_weight: f64,
    /// Subtracted from the mastery score once `failed_attempt_threshold` is reached.
    pub struggle_penalty: f64,
    /// Lowest-scoring lesson below this value counts as struggling.
    pub mastery_threshold: f64,
    pub failed_attempt_threshold: u32,
    /// Exercise score lost per failed attempt.
    pub failure_decay: f64,
    /// Weekly hours at or below which shorter lessons are suggested.
    pub short_week_hours: u32,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            quiz_weight: QUIZ_WEIGHT,
            exercise_weight: EXERCISE_WEIGHT,
            completion_weight: COMPLETION_WEIGHT,
            struggle_penalty: STRUGGLE_PENALTY,
            mastery_threshold: MASTERY_THRESHOLD,
            failed_attempt_threshold: FAILED_ATTEMPT_THRESHOLD,
            failure_decay: FAILURE_DECAY,
            short_week_hours: SHORT_WEEK_HOURS,
        }
    }
}

impl RecommendationWeights {
    pub fn from_env() -> Self {
        let mut weights = Self::default();

        if let Ok(val) = std::env::var("RECOMMENDER_MASTERY_THRESHOLD") {
            weights.mastery_threshold = val.parse().unwrap_or(MASTERY_THRESHOLD);
        }
        if let Ok(val) = std::env::var("RECOMMENDER_FAILED_ATTEMPT_THRESHOLD") {
            weights.failed_attempt_threshold = val.parse().unwrap_or(FAILED_ATTEMPT_THRESHOLD);
        }
        if let Ok(val) = std::env::var("RECOMMENDER_SHORT_WEEK_HOURS") {
            weights.short_week_hours = val.parse().unwrap_or(SHORT_WEEK_HOURS);
        }

        weights
    }
}

use chrono::{DateTime, Utc};

use crate::db::{LatestRecommendation, RecommendationSnapshot, SqliteStore, StoreError};
use crate::recommender::{RecommendationEngine, RecommendationInput, RecommendationWeights};
use crate::services::signals::build_signals;

const DEFAULT_TRACK: &str = "WEB";
const DEFAULT_WEEKLY_HOURS: u32 = 3;

#[derive(Debug, Clone)]
pub struct RecommendationOptions {
    /// Curriculum track whose lessons are candidates.
    pub track: String,
    /// Used when the learner has no profile or no stated commitment.
    pub default_weekly_hours: u32,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            track: DEFAULT_TRACK.to_string(),
            default_weekly_hours: DEFAULT_WEEKLY_HOURS,
        }
    }
}

/// Gathers a learner's signals, runs the engine and records the outcome.
#[derive(Debug, Clone, Default)]
pub struct RecommendationService {
    engine: RecommendationEngine,
    options: RecommendationOptions,
}

impl RecommendationService {
    pub fn new(weights: RecommendationWeights, options: RecommendationOptions) -> Self {
        Self {
            engine: RecommendationEngine::new(weights),
            options,
        }
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub fn options(&self) -> &RecommendationOptions {
        &self.options
    }

    /// Reads the learner's current state into an engine input.
    pub async fn collect_input(
        &self,
        store: &SqliteStore,
        user_id: &str,
    ) -> Result<RecommendationInput, StoreError> {
        let profile = store.profile(user_id).await?.unwrap_or_default();
        let lessons = store.candidate_lessons(user_id, &self.options.track).await?;
        let quiz_attempts = store.quiz_attempts(user_id).await?;
        let exercise_attempts = store.exercise_attempts(user_id).await?;

        Ok(RecommendationInput {
            lessons: build_signals(&lessons, &quiz_attempts, &exercise_attempts, &profile.goals),
            weekly_time_commitment_h: profile
                .weekly_time_commitment_h
                .unwrap_or(self.options.default_weekly_hours),
        })
    }

    pub async fn calculate_and_store(
        &self,
        store: &SqliteStore,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RecommendationSnapshot, StoreError> {
        let input = self.collect_input(store, user_id).await?;
        let (rule, result) = self.engine.decide(&input);
        let snapshot = store.insert_snapshot(user_id, &result, now).await?;

        tracing::info!(
            user_id,
            rule = rule.as_str(),
            lesson_id = snapshot.lesson_id.as_deref().unwrap_or("-"),
            snapshot_id = %snapshot.id,
            "recommendation stored"
        );

        Ok(snapshot)
    }

    pub async fn latest(
        &self,
        store: &SqliteStore,
        user_id: &str,
    ) -> Result<Option<LatestRecommendation>, StoreError> {
        store.latest_snapshot(user_id).await
    }
}

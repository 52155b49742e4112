use std::collections::HashSet;

use super::config::RecommendationWeights;
use super::mastery::mastery_score;
use super::types::{DecisionRule, LessonSignal, PathStep, RecommendationInput, RecommendationResult};

const PREREQUISITE_REASON: &str =
    "You have a missing prerequisite. Completing it first will make the next lessons easier.";
const PREREQUISITE_STEP_REASON: &str = "Prerequisite lesson is required before moving ahead.";
const STRUGGLE_REASON: &str = "You\u{2019}ve had a few difficult attempts here. A remediation mini-lesson and extra practice will strengthen your fundamentals.";
const STRUGGLE_STEP_REASON: &str = "Low mastery score detected from quiz/exercise signals.";
const NEXT_REASON: &str = "Recommended next based on your goals and current progress.";
const NEXT_STEP_REASON: &str = "Best next lesson by prerequisite completion and goal alignment.";
const SHORT_WEEK_NOTE: &str = "Your weekly time commitment suggests shorter lessons first.";
const FULL_WEEK_NOTE: &str = "You can handle the next full lesson sequence this week.";
const COMPLETE_REASON: &str =
    "Great work. You completed all currently published lessons in this track.";

/// Rule-based next-lesson selector.
///
/// Rules are evaluated in a fixed order and the first match wins:
///
/// 1. the first incomplete lesson, in input order, with an unmet prerequisite;
/// 2. the single lowest-mastery incomplete lesson, if it is struggling;
/// 3. the incomplete lesson with the highest goal overlap, earliest
///    `order_index` breaking ties;
/// 4. nothing, once every lesson is complete.
///
/// Rule 1 is the only input-order sensitive rule: when several lessons are
/// blocked, the one supplied first is recommended. A prerequisite id that
/// names no lesson in the input can never be completed, so it always blocks.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    weights: RecommendationWeights,
}

impl RecommendationEngine {
    pub fn new(weights: RecommendationWeights) -> Self {
        Self { weights }
    }

    pub fn recommend(&self, input: &RecommendationInput) -> RecommendationResult {
        self.decide(input).1
    }

    /// Like [`recommend`](Self::recommend) but also reports which rule fired.
    pub fn decide(&self, input: &RecommendationInput) -> (DecisionRule, RecommendationResult) {
        let decision = self
            .unmet_prerequisite(&input.lessons)
            .map(|r| (DecisionRule::UnmetPrerequisite, r))
            .or_else(|| self.struggling(&input.lessons).map(|r| (DecisionRule::Struggling, r)))
            .or_else(|| {
                self.next_in_sequence(&input.lessons, input.weekly_time_commitment_h)
                    .map(|r| (DecisionRule::NextInSequence, r))
            })
            .unwrap_or_else(|| (DecisionRule::TrackComplete, track_complete()));

        tracing::debug!(
            rule = decision.0.as_str(),
            lesson_id = decision.1.lesson_id.as_deref().unwrap_or("-"),
            candidates = input.lessons.len(),
            "recommendation decided"
        );

        decision
    }

    fn unmet_prerequisite(&self, lessons: &[LessonSignal]) -> Option<RecommendationResult> {
        let completed: HashSet<&str> = lessons
            .iter()
            .filter(|l| l.completed)
            .map(|l| l.lesson_id.as_str())
            .collect();

        lessons
            .iter()
            .filter(|l| !l.completed)
            .find(|l| {
                l.prerequisites
                    .iter()
                    .any(|p| !completed.contains(p.as_str()))
            })
            .map(|l| recommend_lesson(l, PREREQUISITE_REASON.to_string(), PREREQUISITE_STEP_REASON))
    }

    fn struggling(&self, lessons: &[LessonSignal]) -> Option<RecommendationResult> {
        let mut scored: Vec<(&LessonSignal, f64)> = lessons
            .iter()
            .filter(|l| !l.completed)
            .map(|l| (l, mastery_score(l, &self.weights)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        // Only the worst performer may escalate.
        let (lesson, score) = scored.first()?;
        if *score < self.weights.mastery_threshold
            || lesson.failed_attempts >= self.weights.failed_attempt_threshold
        {
            Some(recommend_lesson(lesson, STRUGGLE_REASON.to_string(), STRUGGLE_STEP_REASON))
        } else {
            None
        }
    }

    fn next_in_sequence(
        &self,
        lessons: &[LessonSignal],
        weekly_time_commitment_h: u32,
    ) -> Option<RecommendationResult> {
        let mut candidates: Vec<&LessonSignal> = lessons.iter().filter(|l| !l.completed).collect();
        candidates.sort_by_key(|l| l.order_index);
        candidates.sort_by(|a, b| b.goals_overlap_score.cmp(&a.goals_overlap_score));

        let next = candidates.first()?;
        let note = if weekly_time_commitment_h <= self.weights.short_week_hours {
            SHORT_WEEK_NOTE
        } else {
            FULL_WEEK_NOTE
        };

        Some(recommend_lesson(next, format!("{NEXT_REASON} {note}"), NEXT_STEP_REASON))
    }
}

/// Runs the engine with the default weights.
pub fn choose_recommendation(input: &RecommendationInput) -> RecommendationResult {
    RecommendationEngine::default().recommend(input)
}

fn recommend_lesson(lesson: &LessonSignal, reason: String, step_reason: &str) -> RecommendationResult {
    RecommendationResult {
        lesson_id: Some(lesson.lesson_id.clone()),
        module_id: Some(lesson.module_id.clone()),
        reason,
        personalized_path: vec![PathStep {
            lesson_id: lesson.lesson_id.clone(),
            title: lesson.title.clone(),
            reason: step_reason.to_string(),
        }],
    }
}

fn track_complete() -> RecommendationResult {
    RecommendationResult {
        lesson_id: None,
        module_id: None,
        reason: COMPLETE_REASON.to_string(),
        personalized_path: Vec::new(),
    }
}

use super::config::RecommendationWeights;
use super::types::LessonSignal;

/// Exercise component of the mastery score: 1 with no failures, otherwise
/// decays per failure down to 0.
pub fn exercise_score(failed_attempts: u32, weights: &RecommendationWeights) -> f64 {
    if failed_attempts == 0 {
        return 1.0;
    }
    (1.0 - failed_attempts as f64 * weights.failure_decay).max(0.0)
}

/// Weighted blend of quiz, exercise and completion signals.
///
/// Unclamped: the struggle penalty can push it below zero. Only used to rank
/// lessons for struggle detection.
pub fn mastery_score(lesson: &LessonSignal, weights: &RecommendationWeights) -> f64 {
    let completion = lesson.completion_percent as f64 / 100.0;
    let penalty = if lesson.failed_attempts >= weights.failed_attempt_threshold {
        weights.struggle_penalty
    } else {
        0.0
    };

    weights.quiz_weight * lesson.quiz_score_ratio
        + weights.exercise_weight * exercise_score(lesson.failed_attempts, weights)
        + weights.completion_weight * completion
        - penalty
}

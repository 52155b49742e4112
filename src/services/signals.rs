//! Turns stored learner activity into engine signals.

use std::collections::HashMap;

use crate::db::{CandidateLesson, ExerciseAttemptRecord, ProgressStatus, QuizAttemptRecord};
use crate::recommender::LessonSignal;

/// Score ratio of the newest attempt per lesson. `attempts` must be newest first.
pub fn latest_quiz_ratios(attempts: &[QuizAttemptRecord]) -> HashMap<&str, f64> {
    let mut ratios = HashMap::new();
    for attempt in attempts {
        ratios
            .entry(attempt.lesson_id.as_str())
            .or_insert_with(|| attempt.score_ratio());
    }
    ratios
}

/// Non-passing exercise attempts per lesson.
pub fn failed_attempt_counts(attempts: &[ExerciseAttemptRecord]) -> HashMap<&str, u32> {
    let mut counts = HashMap::new();
    for attempt in attempts.iter().filter(|a| !a.result.is_pass()) {
        *counts.entry(attempt.lesson_id.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Normalizes learner goals for overlap matching.
pub fn goal_keywords(goals: &[String]) -> Vec<String> {
    goals.iter().map(|g| g.to_lowercase()).collect()
}

/// Counts tags that overlap any goal, by case-insensitive substring match in
/// either direction. `goals` must already be lowercased.
pub fn goals_overlap_score(tags: &[String], goals: &[String]) -> u32 {
    tags.iter()
        .filter(|tag| {
            let tag = tag.to_lowercase();
            goals
                .iter()
                .any(|goal| goal.contains(&tag) || tag.contains(goal.as_str()))
        })
        .count() as u32
}

/// Builds one signal per candidate lesson. `orderIndex` is the lesson's
/// position in `lessons`, which must already be in curriculum order.
pub fn build_signals(
    lessons: &[CandidateLesson],
    quiz_attempts: &[QuizAttemptRecord],
    exercise_attempts: &[ExerciseAttemptRecord],
    goals: &[String],
) -> Vec<LessonSignal> {
    let quiz_ratios = latest_quiz_ratios(quiz_attempts);
    let failures = failed_attempt_counts(exercise_attempts);
    let goals = goal_keywords(goals);

    lessons
        .iter()
        .enumerate()
        .map(|(index, lesson)| LessonSignal {
            lesson_id: lesson.id.clone(),
            title: lesson.title.clone(),
            module_id: lesson.module_id.clone(),
            order_index: index as i64,
            prerequisites: lesson.prerequisites.clone(),
            completed: lesson
                .progress
                .is_some_and(|p| p.status == ProgressStatus::Completed),
            completion_percent: lesson.progress.map(|p| p.percent).unwrap_or(0),
            quiz_score_ratio: quiz_ratios.get(lesson.id.as_str()).copied().unwrap_or(0.0),
            failed_attempts: failures.get(lesson.id.as_str()).copied().unwrap_or(0),
            goals_overlap_score: goals_overlap_score(&lesson.tags, &goals),
        })
        .collect()
}

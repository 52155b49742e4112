//! Property tests for the recommendation engine.
//!
//! - Determinism: repeated calls agree
//! - Rules 2 and 3 do not depend on input order when ranking keys are unique
//! - A recommended lesson is never one already completed

use proptest::prelude::*;

use lesson_recommender::recommender::{
    choose_recommendation, LessonSignal, RecommendationInput,
};

// ============================================================================
// Generators
// ============================================================================

/// Lessons that never trip the struggle rule, with unique `order_index`.
fn arb_healthy_lessons() -> impl Strategy<Value = Vec<LessonSignal>> {
    prop::collection::vec(
        (80u32..=100, 60u32..=100, 0u32..4, any::<bool>()),
        1..10,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (quiz, percent, overlap, completed))| LessonSignal {
                quiz_score_ratio: quiz as f64 / 100.0,
                completion_percent: percent,
                goals_overlap_score: overlap,
                completed,
                ..LessonSignal::new(&format!("lesson-{i}"), "module-1", i as i64)
            })
            .collect()
    })
}

/// Lessons with pairwise distinct mastery scores.
fn arb_scored_lessons() -> impl Strategy<Value = Vec<LessonSignal>> {
    prop::collection::hash_set(0u32..=20, 1..8).prop_map(|quiz_steps| {
        quiz_steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| LessonSignal {
                quiz_score_ratio: step as f64 / 20.0,
                ..LessonSignal::new(&format!("lesson-{i}"), "module-1", i as i64)
            })
            .collect()
    })
}

fn recommend(lessons: Vec<LessonSignal>, weekly_hours: u32) -> Option<String> {
    choose_recommendation(&RecommendationInput {
        lessons,
        weekly_time_commitment_h: weekly_hours,
    })
    .lesson_id
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_recommendation_is_deterministic(lessons in arb_healthy_lessons(), hours in 0u32..10) {
        let input = RecommendationInput { lessons, weekly_time_commitment_h: hours };
        prop_assert_eq!(choose_recommendation(&input), choose_recommendation(&input));
    }

    #[test]
    fn prop_next_in_sequence_ignores_input_order(
        (lessons, shuffled) in arb_healthy_lessons()
            .prop_flat_map(|l| (Just(l.clone()), Just(l).prop_shuffle())),
    ) {
        prop_assert_eq!(recommend(lessons, 3), recommend(shuffled, 3));
    }

    #[test]
    fn prop_struggle_ignores_input_order(
        (lessons, shuffled) in arb_scored_lessons()
            .prop_flat_map(|l| (Just(l.clone()), Just(l).prop_shuffle())),
    ) {
        prop_assert_eq!(recommend(lessons, 3), recommend(shuffled, 3));
    }

    #[test]
    fn prop_never_recommends_completed_lesson(lessons in arb_healthy_lessons()) {
        let any_open = lessons.iter().any(|l| !l.completed);
        let picked = recommend(lessons.clone(), 3);

        prop_assert_eq!(picked.is_some(), any_open);
        if let Some(id) = picked {
            let lesson = lessons.iter().find(|l| l.lesson_id == id);
            prop_assert!(lesson.is_some_and(|l| !l.completed));
        }
    }
}

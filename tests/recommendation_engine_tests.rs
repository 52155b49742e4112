use lesson_recommender::recommender::{
    choose_recommendation, mastery_score, DecisionRule, LessonSignal, RecommendationEngine,
    RecommendationInput, RecommendationWeights,
};

fn healthy(id: &str, order_index: i64) -> LessonSignal {
    LessonSignal {
        quiz_score_ratio: 0.9,
        completion_percent: 50,
        ..LessonSignal::new(id, "module-1", order_index)
    }
}

fn completed(id: &str, order_index: i64) -> LessonSignal {
    LessonSignal {
        completed: true,
        completion_percent: 100,
        ..healthy(id, order_index)
    }
}

fn input(lessons: Vec<LessonSignal>, weekly_hours: u32) -> RecommendationInput {
    RecommendationInput {
        lessons,
        weekly_time_commitment_h: weekly_hours,
    }
}

#[test]
fn integration_same_input_same_output() {
    let input = input(
        vec![completed("intro", 0), healthy("a", 1), healthy("b", 2)],
        4,
    );
    let first = choose_recommendation(&input);
    for _ in 0..10 {
        assert_eq!(choose_recommendation(&input), first);
    }
}

#[test]
fn integration_prerequisite_takes_precedence() {
    let mut target = healthy("target-1", 1);
    target.prerequisites = vec!["intro".to_string()];
    // a struggling lesson further down must not win over the blocked one
    let mut weak = healthy("weak", 2);
    weak.quiz_score_ratio = 0.0;
    weak.failed_attempts = 5;

    let result = choose_recommendation(&input(vec![healthy("intro", 0), target, weak], 3));

    assert_eq!(result.lesson_id.as_deref(), Some("target-1"));
    assert!(result.reason.contains("prerequisite"));
    assert_eq!(result.personalized_path.len(), 1);
    assert!(result.personalized_path[0].reason.contains("Prerequisite"));
}

#[test]
fn integration_struggle_escalation() {
    let mut weak = healthy("weak", 1);
    weak.quiz_score_ratio = 0.2;
    weak.failed_attempts = 3;

    let result = choose_recommendation(&input(vec![healthy("strong", 0), weak], 3));

    assert_eq!(result.lesson_id.as_deref(), Some("weak"));
    assert!(result.reason.contains("difficult attempts"));
    assert!(result.personalized_path[0].reason.contains("Low mastery"));
}

#[test]
fn integration_goal_boost_beats_curriculum_order() {
    let mut boosted = healthy("boosted", 5);
    boosted.goals_overlap_score = 2;

    let result = choose_recommendation(&input(vec![healthy("first", 0), boosted], 3));

    assert_eq!(result.lesson_id.as_deref(), Some("boosted"));
    assert!(result.reason.starts_with("Recommended next based on your goals"));
}

#[test]
fn integration_all_completed_finishes_track() {
    let result = choose_recommendation(&input(vec![completed("a", 0), completed("b", 1)], 3));

    assert!(result.is_finished());
    assert_eq!(result.module_id, None);
    assert!(result.reason.contains("completed all"));
    assert!(result.personalized_path.is_empty());
}

#[test]
fn integration_weekly_hours_time_note() {
    let lessons = vec![healthy("a", 0)];

    let short = choose_recommendation(&input(lessons.clone(), 1));
    assert!(short.reason.contains("shorter lessons"));

    let boundary = choose_recommendation(&input(lessons.clone(), 2));
    assert!(boundary.reason.contains("shorter lessons"));

    let full = choose_recommendation(&input(lessons, 5));
    assert!(full.reason.contains("full lesson sequence"));
}

#[test]
fn integration_rule_one_uses_input_order() {
    let mut x = healthy("x", 9);
    x.prerequisites = vec!["missing".to_string()];
    let mut y = healthy("y", 0);
    y.prerequisites = vec!["missing".to_string()];

    let xy = choose_recommendation(&input(vec![x.clone(), y.clone()], 3));
    let yx = choose_recommendation(&input(vec![y, x], 3));

    assert_eq!(xy.lesson_id.as_deref(), Some("x"));
    assert_eq!(yx.lesson_id.as_deref(), Some("y"));
}

#[test]
fn integration_rules_two_and_three_ignore_input_order() {
    let mut weak = healthy("weak", 3);
    weak.quiz_score_ratio = 0.1;
    let lessons = vec![healthy("a", 0), weak, healthy("b", 1)];

    let forward = choose_recommendation(&input(lessons.clone(), 3));
    let mut reversed = lessons;
    reversed.reverse();
    assert_eq!(choose_recommendation(&input(reversed, 3)), forward);
    assert_eq!(forward.lesson_id.as_deref(), Some("weak"));

    let sequence = vec![healthy("c", 2), healthy("a", 0), healthy("b", 1)];
    let result = choose_recommendation(&input(sequence, 3));
    assert_eq!(result.lesson_id.as_deref(), Some("a"));
}

#[test]
fn integration_decide_reports_fired_rule() {
    let engine = RecommendationEngine::default();

    let (rule, _) = engine.decide(&input(vec![healthy("a", 0)], 3));
    assert_eq!(rule, DecisionRule::NextInSequence);

    let (rule, _) = engine.decide(&input(vec![], 3));
    assert_eq!(rule, DecisionRule::TrackComplete);
}

#[test]
fn integration_mastery_score_formula() {
    let weights = RecommendationWeights::default();
    let mut lesson = LessonSignal::new("a", "m", 0);
    lesson.quiz_score_ratio = 0.6;
    lesson.completion_percent = 50;
    lesson.failed_attempts = 4;

    // 0.45*0.6 + 0.35*0.6 + 0.2*0.5 - 0.15
    let expected = 0.27 + 0.21 + 0.1 - 0.15;
    assert!((mastery_score(&lesson, &weights) - expected).abs() < 1e-9);
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::learner::NewQuizAttempt;
use crate::db::{QuizAttemptRecord, QuizQuestion, SqliteStore, StoreError};

pub const QUIZ_PASSING_SCORE_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: String,
    pub response: String,
    pub correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGrade {
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub results: Vec<QuestionResult>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub attempt: QuizAttemptRecord,
    pub grade: QuizGrade,
}

/// Grades answers keyed by question id. Comparison trims whitespace but is
/// otherwise exact; a missing answer is an empty response.
pub fn grade_quiz(questions: &[QuizQuestion], answers: &HashMap<String, String>) -> QuizGrade {
    let results: Vec<QuestionResult> = questions
        .iter()
        .map(|question| {
            let response = answers.get(&question.id).cloned().unwrap_or_default();
            QuestionResult {
                correct: response.trim() == question.correct_answer.trim(),
                question_id: question.id.clone(),
                response,
                explanation: question.explanation.clone(),
            }
        })
        .collect();

    let score = results.iter().filter(|r| r.correct).count() as u32;
    let max_score = questions.len() as u32;
    let passed = max_score > 0 && score as f64 / max_score as f64 >= QUIZ_PASSING_SCORE_RATIO;

    QuizGrade {
        score,
        max_score,
        passed,
        results,
    }
}

pub async fn submit_quiz(
    store: &SqliteStore,
    user_id: &str,
    lesson_id: &str,
    answers: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Result<QuizSubmission, StoreError> {
    let questions = store.quiz_questions(lesson_id).await?;
    let grade = grade_quiz(&questions, answers);
    let answers_json = serde_json::to_value(answers)?;

    let attempt = store
        .insert_quiz_attempt(
            NewQuizAttempt {
                user_id,
                lesson_id,
                score: grade.score,
                max_score: grade.max_score,
                passed: grade.passed,
                answers: &answers_json,
            },
            now,
        )
        .await?;

    tracing::debug!(user_id, lesson_id, score = grade.score, max_score = grade.max_score, "quiz graded");
    Ok(QuizSubmission { attempt, grade })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, answer: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            lesson_id: "l1".to_string(),
            prompt: format!("prompt {id}"),
            correct_answer: answer.to_string(),
            explanation: format!("because {answer}"),
            order_index: 0,
        }
    }

    fn answers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_all_correct_passes() {
        let questions = vec![question("q1", "div"), question("q2", "span")];
        let grade = grade_quiz(&questions, &answers(&[("q1", " div "), ("q2", "span")]));
        assert_eq!(grade.score, 2);
        assert_eq!(grade.max_score, 2);
        assert!(grade.passed);
    }

    #[test]
    fn test_below_ratio_fails() {
        let questions: Vec<_> = (0..5).map(|i| question(&format!("q{i}"), "a")).collect();
        let grade = grade_quiz(&questions, &answers(&[("q0", "a"), ("q1", "a"), ("q2", "a")]));
        assert_eq!(grade.score, 3);
        assert!(!grade.passed);
        assert_eq!(grade.results[4].response, "");
        assert!(!grade.results[4].correct);
    }

    #[test]
    fn test_exactly_eighty_percent_passes() {
        let questions: Vec<_> = (0..5).map(|i| question(&format!("q{i}"), "a")).collect();
        let grade = grade_quiz(
            &questions,
            &answers(&[("q0", "a"), ("q1", "a"), ("q2", "a"), ("q3", "a")]),
        );
        assert!(grade.passed);
    }

    #[test]
    fn test_no_questions_never_passes() {
        let grade = grade_quiz(&[], &HashMap::new());
        assert_eq!(grade.max_score, 0);
        assert!(!grade.passed);
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let grade = grade_quiz(&[question("q1", "DIV")], &answers(&[("q1", "div")]));
        assert_eq!(grade.score, 0);
    }
}

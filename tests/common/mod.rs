#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use lesson_recommender::db::{
    ExerciseRecord, LearnerProfile, LessonRecord, ModuleRecord, QuizQuestion, SqliteStore,
};
use lesson_recommender::services::RecommendationService;

pub const USER: &str = "learner-1";

/// A migrated store backed by a file in a temp dir. Keep the dir alive.
pub async fn create_test_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
    let store = SqliteStore::connect(&url).await.expect("failed to open store");
    (store, dir)
}

pub async fn create_test_app() -> (Router, SqliteStore, TempDir) {
    let (store, dir) = create_test_store().await;
    seed_curriculum(&store).await;
    let app = lesson_recommender::create_app(store.clone(), RecommendationService::default());
    (app, store, dir)
}

pub fn module(id: &str, slug: &str, order_index: i64, published: bool) -> ModuleRecord {
    ModuleRecord {
        id: id.to_string(),
        slug: slug.to_string(),
        title: slug.replace('-', " "),
        description: String::new(),
        order_index,
        published,
        coming_soon: !published,
        track: "WEB".to_string(),
    }
}

pub fn lesson(id: &str, module_id: &str, order_index: i64, tags: &[&str], prerequisites: &[&str]) -> LessonRecord {
    LessonRecord {
        id: id.to_string(),
        module_id: module_id.to_string(),
        slug: id.to_string(),
        title: id.to_uppercase(),
        summary: String::new(),
        order_index,
        estimated_minutes: 15,
        difficulty: 1,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        published: true,
        prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
    }
}

/// Two published WEB modules and one draft:
///
/// - `html-basics`: `html-1`, `html-2` (needs `html-1`)
/// - `css-basics`: `css-1` (needs `html-2`)
/// - `drafts` (unpublished): `draft-1`
pub async fn seed_curriculum(store: &SqliteStore) {
    store.upsert_module(&module("m-css", "css-basics", 2, true)).await.unwrap();
    store.upsert_module(&module("m-html", "html-basics", 1, true)).await.unwrap();
    store.upsert_module(&module("m-draft", "drafts", 3, false)).await.unwrap();

    for record in [
        lesson("css-1", "m-css", 1, &["css", "design"], &["html-2"]),
        lesson("html-2", "m-html", 2, &["html"], &["html-1"]),
        lesson("html-1", "m-html", 1, &["html", "web"], &[]),
        lesson("draft-1", "m-draft", 1, &["css"], &[]),
    ] {
        store.upsert_lesson(&record).await.unwrap();
    }

    store
        .upsert_exercise(&ExerciseRecord {
            id: "ex-html-1".to_string(),
            lesson_id: "html-1".to_string(),
            title: "Build a page".to_string(),
            order_index: 1,
        })
        .await
        .unwrap();

    for (index, (id, answer)) in [("q-html-1", "div"), ("q-html-2", "p")].into_iter().enumerate() {
        store
            .upsert_quiz_question(&QuizQuestion {
                id: id.to_string(),
                lesson_id: "html-1".to_string(),
                prompt: format!("question {id}"),
                correct_answer: answer.to_string(),
                explanation: format!("the answer is {answer}"),
                order_index: index as i64,
            })
            .await
            .unwrap();
    }
}

pub async fn seed_profile(store: &SqliteStore, goals: &[&str], weekly_hours: Option<u32>) {
    store
        .upsert_profile(&LearnerProfile {
            user_id: USER.to_string(),
            goals: goals.iter().map(|g| g.to_string()).collect(),
            weekly_time_commitment_h: weekly_hours,
        })
        .await
        .unwrap();
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

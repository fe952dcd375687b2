use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use http::{header, Request, StatusCode};
use polls::clock::FixedClock;
use polls::store::{MemoryStore, PollStore};
use polls::templates::Templates;
use polls::{create_routes, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
}

fn app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        Arc::new(FixedClock(now())),
        Templates::new().unwrap(),
    );
    (store, create_routes(state, false))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(body: Value) -> Request<Body> {
    Request::post("/admin/questions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn creates_question_with_choices() {
    let (store, router) = app();

    let (status, body) = send(
        &router,
        post_json(json!({
            "question_text": "Best editor?",
            "pub_date": "2024-03-09T12:00:00Z",
            "choices": ["vim", "emacs"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["question"]["question_text"], "Best editor?");
    assert_eq!(body["choices"][1]["choice_text"], "emacs");
    assert_eq!(body["choices"][1]["votes"], 0);

    let id = body["question"]["id"].as_i64().unwrap();
    let question = store.find_question(id).await.unwrap().unwrap();
    assert_eq!(question.pub_date, now() - chrono::Duration::days(1));
    assert_eq!(store.choices_for(id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn created_question_without_pub_date_is_visible_now() {
    let (_, router) = app();

    let (status, body) = send(
        &router,
        post_json(json!({ "question_text": "Lunch?", "choices": ["yes"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["question"]["id"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(Request::get(format!("/{id}/")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rejects_invalid_texts() {
    let (_, router) = app();

    let (status, body) = send(
        &router,
        post_json(json!({ "question_text": "", "choices": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "question_text must not be blank");

    let (status, body) = send(
        &router,
        post_json(json!({ "question_text": "ok", "choices": ["y".repeat(201)] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "choice_text must be at most 200 characters");
}

#[tokio::test]
async fn delete_cascades_and_reports_missing() {
    let (store, router) = app();
    let poll = store
        .create_question("Doomed", now(), &["a".to_string(), "b".to_string()])
        .await
        .unwrap();
    let id = poll.question.id;

    let delete = |id: i64| {
        Request::delete(format!("/admin/questions/{id}"))
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(&router, delete(id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.find_question(id).await.unwrap().is_none());
    assert!(store.choices_for(id).await.unwrap().is_empty());

    let (status, body) = send(&router, delete(id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "question not found");
}

#[tokio::test]
async fn unreadable_bodies_answer_in_json() {
    let (_, router) = app();

    let (status, body) = send(&router, post_json(json!({ "choices": ["a"] }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("question_text"));

    let malformed = Request::post("/admin/questions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send(&router, malformed).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn delete_with_non_integer_id_is_json_not_found() {
    let (_, router) = app();
    let request = Request::delete("/admin/questions/abc")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "question not found");
}

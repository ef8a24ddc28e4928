#![cfg(feature = "server")]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use finance_tracker::api::{router, AppState};
use finance_tracker::{InMemoryEntryRepository, SqliteEntryRepository};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(InMemoryEntryRepository::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

const COFFEE: &str =
    r#"{"description": "Coffee", "amount": -4.50, "category": "Food", "date": "2024-01-05"}"#;

#[tokio::test]
async fn health_reports_ok() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn create_list_update_delete_lifecycle() {
    let app = app();

    let (status, created) = send(&app, Method::POST, "/entries", Some(COFFEE)).await;
    assert_eq!(status, StatusCode::CREATED);
    let expected: Value = serde_json::from_str(
        r#"{"id": 1, "description": "Coffee", "amount": -4.50, "category": "Food", "date": "2024-01-05"}"#,
    )
    .unwrap();
    assert_eq!(created, expected);

    let (status, list) = send(&app, Method::GET, "/entries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([created.clone()]));

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/entries/1",
        Some(r#"{"category": "Dining"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["category"], "Dining");
    assert_eq!(updated["description"], "Coffee");
    assert_eq!(updated["amount"].to_string(), "-4.50");
    assert_eq!(updated["date"], "2024-01-05");

    let (status, body) = send(&app, Method::DELETE, "/entries/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Entry 1 deleted"}));

    let (_, list) = send(&app, Method::GET, "/entries", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn create_missing_amount_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/entries",
        Some(r#"{"description": "Coffee", "category": "Food", "date": "2024-01-05"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["field"], "amount");

    let (_, list) = send(&app, Method::GET, "/entries", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn create_non_numeric_amount_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/entries",
        Some(r#"{"description": "Coffee", "amount": "abc", "category": "Food", "date": "2024-01-05"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "amount");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/entries", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "body");

    let (status, _) = send(&app, Method::POST, "/entries", Some("[]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_update_returns_entry_unchanged() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/entries", Some(COFFEE)).await;

    let (status, updated) = send(&app, Method::PUT, "/entries/1", Some("{}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, created);
}

#[tokio::test]
async fn invalid_update_is_bad_request() {
    let app = app();
    send(&app, Method::POST, "/entries", Some(COFFEE)).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/entries/1",
        Some(r#"{"description": "   "}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "description");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app();

    let (status, body) = send(&app, Method::PUT, "/entries/999", Some(COFFEE)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(&app, Method::DELETE, "/entries/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/entries/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/entries/coffee", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_entry_stays_gone() {
    let app = app();
    send(&app, Method::POST, "/entries", Some(COFFEE)).await;
    send(&app, Method::DELETE, "/entries/1", None).await;

    let (status, _) = send(&app, Method::DELETE, "/entries/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PUT, "/entries/1", Some("{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, created) = send(&app, Method::POST, "/entries", Some(COFFEE)).await;
    assert_eq!(created["id"], 2);
}

#[tokio::test]
async fn summary_reports_running_total() {
    let app = app();
    send(&app, Method::POST, "/entries", Some(COFFEE)).await;
    send(
        &app,
        Method::POST,
        "/entries",
        Some(r#"{"description": "Salary", "amount": "2500.25", "category": "Income", "date": "2024-01-31"}"#),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/entries/summary", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["running_total"].to_string(), "2495.75");
}

#[tokio::test]
async fn summary_overflow_does_not_wedge_server() {
    let app = app();
    let windfall = r#"{"description": "Windfall", "amount": "70000000000000000000000000000", "category": "Income", "date": "2024-01-01"}"#;

    let (status, _) = send(&app, Method::POST, "/entries", Some(windfall)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, Method::POST, "/entries", Some(windfall)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/entries/summary", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "total_overflow");

    let (status, list) = send(&app, Method::GET, "/entries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn high_precision_amount_round_trips() {
    let app = app();
    let body = r#"{"description": "Bond", "amount": "12345678901234567.89", "category": "Investments", "date": "2024-03-01"}"#;

    let (status, created) = send(&app, Method::POST, "/entries", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["amount"].to_string(), "12345678901234567.89");

    // Echo the amount back exactly as served; nothing may drift
    let echo = format!(r#"{{"amount": {}}}"#, created["amount"]);
    let (status, updated) = send(&app, Method::PUT, "/entries/1", Some(&echo)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"].to_string(), "12345678901234567.89");

    let (_, fetched) = send(&app, Method::GET, "/entries/1", None).await;
    assert_eq!(fetched["amount"].to_string(), "12345678901234567.89");
}

#[tokio::test]
async fn sqlite_backed_router_round_trip() {
    let app = router(AppState::new(SqliteEntryRepository::open_in_memory().unwrap()));

    let (status, created) = send(&app, Method::POST, "/entries", Some(COFFEE)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, fetched) = send(&app, Method::GET, "/entries/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

//! Integration tests for the HTTP surface
//!
//! Tests cover:
//! - Health endpoint
//! - Static pages
//! - GET-based create-frequency and create-phrase flows (redirects)
//! - Validation and not-found failures
//! - JSON listing order

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

use cadence::db;
use cadence::events::EventBus;
use cadence::{build_router, AppState};

/// Test helper: build a router over a throwaway database
async fn setup_app() -> (axum::Router, TempDir) {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let pool = db::init_database(&dir.path().join("cadence.db"))
        .await
        .expect("should initialize database");
    let state = AppState::new(pool, Arc::new(EventBus::new(64)));
    (build_router(state), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("should read body");
    serde_json::from_slice(&bytes).expect("should parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "cadence");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_home_page_is_html() {
    let (app, _dir) = setup_app().await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_create_frequency_redirects_to_new_phrase_page() {
    let (app, _dir) = setup_app().await;

    let response = app
        .oneshot(get("/frequency/create?interval=5&duration=60&privacy=public"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(location, "/phrase/new?frequency_id=1");
}

#[tokio::test]
async fn test_create_frequency_requires_interval_and_duration() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/frequency/create?duration=60"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("interval"));

    let response = app
        .oneshot(get("/frequency/create?interval=5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_frequency_rejects_non_positive_values() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/frequency/create?interval=0&duration=60"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/frequency/create?interval=5&duration=-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_phrase_redirects_home_and_persists() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/frequency/create?interval=5&duration=60"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .clone()
        .oneshot(get("/phrase/create?frequency_id=1&text=hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(location, "/");

    let response = app.oneshot(get("/api/frequencies")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["frequencies"][0]["phrases"][0]["text"], "hello");
}

#[tokio::test]
async fn test_create_phrase_for_unknown_frequency_is_404() {
    let (app, _dir) = setup_app().await;

    let response = app
        .oneshot(get("/phrase/create?frequency_id=999&text=lost"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let (app, _dir) = setup_app().await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get("/frequency/create?interval=1&duration=10"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let response = app.oneshot(get("/api/frequencies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["frequencies"][0]["id"], 2);
    assert_eq!(body["frequencies"][1]["id"], 1);
}

#[tokio::test]
async fn test_form_pages_are_served() {
    let (app, _dir) = setup_app().await;

    for uri in ["/frequency/new", "/phrase/new", "/about", "/login"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "page {} should serve", uri);
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tests for the scheduled sweep endpoint: scheduler auth, failure mapping
//! and the `{"sent": n}` success body.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use lifemastery_reminders::models::SessionStatus;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

mod common;

fn sweep_request(job: Option<&str>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/tasks/inactivity-sweep");
    if let Some(job) = job {
        builder = builder.header("x-cloudscheduler-jobname", job);
    }
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_sweep_without_job_header_forbidden() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(sweep_request(None, Some("test_sweep_token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sweep_wrong_job_forbidden() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(sweep_request(Some("some-other-job"), Some("test_sweep_token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sweep_missing_token_unauthorized() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(sweep_request(Some("inactivity-sweep"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sweep_wrong_token_forbidden() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(sweep_request(Some("inactivity-sweep"), Some("guess")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sweep_store_unreachable_is_server_error() {
    // Offline database: the sweep passes auth and then fails to read the store
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(sweep_request(
            Some("inactivity-sweep"),
            Some("test_sweep_token"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "database_error");
}

/// Fake push provider that accepts every notification and records its targets.
async fn fake_push_provider() -> (String, Arc<Mutex<Vec<String>>>) {
    let targets: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = targets.clone();

    let app = Router::new().route(
        "/notifications",
        post(move |Json(body): Json<serde_json::Value>| {
            let sink = sink.clone();
            async move {
                if let Some(ids) = body["include_player_ids"].as_array() {
                    sink.lock()
                        .unwrap()
                        .extend(ids.iter().filter_map(|id| id.as_str()).map(str::to_string));
                }
                Json(serde_json::json!({"id": "n-1", "recipients": 1}))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (format!("http://{}", addr), targets)
}

#[tokio::test]
async fn test_sweep_reminds_idle_subjects() {
    require_emulator!();

    let db = common::test_db().await;
    let suffix = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let idle_a = format!("sweep-idle-a-{suffix}");
    let idle_b = format!("sweep-idle-b-{suffix}");
    let busy = format!("sweep-busy-{suffix}");
    let fresh = format!("sweep-fresh-{suffix}");

    let long_ago = chrono::Utc::now() - chrono::TimeDelta::hours(3);
    db.touch_activity(&idle_a, long_ago).await.unwrap();
    db.touch_activity(&idle_b, long_ago).await.unwrap();
    db.touch_activity(&busy, long_ago).await.unwrap();
    db.set_session_status(&busy, SessionStatus::Running, chrono::Utc::now())
        .await
        .unwrap();
    db.touch_activity(&fresh, chrono::Utc::now()).await.unwrap();

    let (base_url, targets) = fake_push_provider().await;
    let (app, _) = common::create_test_app_with(db, &base_url);

    let response = app
        .oneshot(sweep_request(
            Some("inactivity-sweep"),
            Some("test_sweep_token"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    // The emulator may hold idle records from other tests too
    let targets = targets.lock().unwrap().clone();
    assert_eq!(json["sent"].as_u64(), Some(targets.len() as u64));
    assert!(targets.contains(&idle_a));
    assert!(targets.contains(&idle_b));
    assert!(!targets.contains(&busy));
    assert!(!targets.contains(&fresh));
}

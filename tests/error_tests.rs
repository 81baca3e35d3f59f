// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{http::StatusCode, response::IntoResponse};
use lifemastery_reminders::error::AppError;

async fn error_body(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_not_found_includes_details() {
    let (status, json) = error_body(AppError::NotFound("No activity for p1".to_string())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["details"], "No activity for p1");
}

#[tokio::test]
async fn test_push_failure_is_bad_gateway() {
    let (status, json) = error_body(AppError::PushApi("all 3 dispatches failed".to_string())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "push_error");
    // Upstream detail stays in the logs
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_database_error_hides_details() {
    let (status, json) = error_body(AppError::Database("connection refused".to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "database_error");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_internal_error_from_anyhow() {
    let err: AppError = anyhow::anyhow!("boom").into();
    let (status, json) = error_body(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal_error");
}

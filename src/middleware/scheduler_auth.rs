// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cloud Scheduler authentication middleware.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header Cloud Scheduler sets to the name of the triggering job.
pub const JOB_NAME_HEADER: &str = "x-cloudscheduler-jobname";

/// Require the sweep job header + the shared sweep token for `/tasks/*` routes.
pub async fn require_scheduler_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let job_header = request.headers().get(JOB_NAME_HEADER);
    let is_valid_job = job_header
        .and_then(|h| h.to_str().ok())
        .map(|name| name == crate::config::SWEEP_JOB_NAME)
        .unwrap_or(false);

    if !is_valid_job {
        tracing::warn!(
            header = ?job_header,
            "Blocked tasks request with invalid scheduler job header"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::warn!("Blocked tasks request without bearer token");
            StatusCode::UNAUTHORIZED
        })?;

    let expected = state.config.sweep_token.as_bytes();
    if !bool::from(token.as_bytes().ct_eq(expected)) {
        tracing::warn!("Blocked tasks request: sweep token mismatch");
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}

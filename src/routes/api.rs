// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityRecord, SessionStatus};
use crate::time_utils::{clamp_to_now, format_utc_rfc3339};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activity", get(get_activity).post(touch_activity))
        .route("/api/activity/status", put(set_status))
}

// ─── Activity ────────────────────────────────────────────────

/// Current activity record.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityResponse {
    pub subject_id: String,
    pub last_active_at: String,
    pub session_status: SessionStatus,
}

impl ActivityResponse {
    fn from_record(subject_id: &str, record: ActivityRecord) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            last_active_at: format_utc_rfc3339(record.last_active_at),
            session_status: record.session_status,
        }
    }
}

/// Get the caller's activity record.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ActivityResponse>> {
    let record = state
        .db
        .get_activity_record(&user.subject_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No activity for {}", user.subject_id)))?;

    Ok(Json(ActivityResponse::from_record(&user.subject_id, record)))
}

/// Body for recording an interaction.
#[derive(Debug, Default, Deserialize)]
pub struct TouchRequest {
    /// When the interaction happened on the device. Defaults to now;
    /// future values are clamped to now.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// Record an interaction for the caller.
async fn touch_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<TouchRequest>,
) -> Result<Json<ActivityResponse>> {
    let at = clamp_to_now(body.at, Utc::now());
    let record = state.db.touch_activity(&user.subject_id, at).await?;

    Ok(Json(ActivityResponse::from_record(&user.subject_id, record)))
}

/// Body for a session status change.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: SessionStatus,
}

/// Start or stop the caller's timed session.
async fn set_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<ActivityResponse>> {
    let record = state
        .db
        .set_session_status(&user.subject_id, body.status, Utc::now())
        .await?;

    Ok(Json(ActivityResponse::from_record(&user.subject_id, record)))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Task handler routes for Cloud Scheduler callbacks.
//!
//! These endpoints are called by the scheduler, not directly by users, and
//! are protected by [`require_scheduler_auth`](crate::middleware::require_scheduler_auth).

use crate::error::Result;
use crate::services::InactivitySweep;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Task handler routes (called by Cloud Scheduler).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tasks/inactivity-sweep", post(inactivity_sweep))
}

/// Response for a completed sweep.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SweepResponse {
    /// Reminders handed to the push provider.
    pub sent: usize,
}

/// Remind every idle subject that is not in a session.
///
/// Returns 200 with the attempted count; a store failure or a total push
/// failure maps to a non-2xx error so the scheduler records the run as failed.
async fn inactivity_sweep(State(state): State<Arc<AppState>>) -> Result<Json<SweepResponse>> {
    tracing::info!("Starting inactivity sweep");

    let report = InactivitySweep::new(
        &state.db,
        &state.push,
        state.config.sweep_policy(),
        &state.config.reminder,
    )
    .run(chrono::Utc::now())
    .await?;

    Ok(Json(SweepResponse { sent: report.sent }))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-user activity record for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Whether a timed session (a Pomodoro) is in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SessionStatus {
    Running,
    #[default]
    Stopped,
}

impl SessionStatus {
    pub fn is_running(self) -> bool {
        self == SessionStatus::Running
    }
}

/// Last known interaction of one user, stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Push subscriber ID (also used as document ID). Legacy documents may
    /// lack it, in which case nothing can be dispatched to them.
    #[serde(default)]
    pub subject_id: Option<String>,
    /// Most recent observed interaction; never moves backwards.
    pub last_active_at: DateTime<Utc>,
    /// Absent in older documents, which means no session is running.
    #[serde(default)]
    pub session_status: SessionStatus,
}

impl ActivityRecord {
    /// Record created by a subject's first observed interaction.
    pub fn new(subject_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
            last_active_at: at,
            session_status: SessionStatus::Stopped,
        }
    }

    /// Advance `last_active_at` to `at`. Returns `false` (and leaves the
    /// record untouched) if `at` is not newer than what is stored.
    pub fn touch(&mut self, at: DateTime<Utc>) -> bool {
        if at <= self.last_active_at {
            return false;
        }
        self.last_active_at = at;
        true
    }

    /// The address a reminder would be sent to, if the record has one.
    pub fn dispatch_target(&self) -> Option<&str> {
        self.subject_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

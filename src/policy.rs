// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Inactivity policy: decides whether an idle user is due a reminder.
//!
//! Both the on-device watcher and the scheduled sweep evaluate the same
//! rule, each with its own limits. Evaluation is pure: callers supply every
//! timestamp, including "now".

use crate::models::SessionStatus;
use chrono::{DateTime, TimeDelta, Utc};

/// Thresholds for one reminder mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InactivityPolicy {
    /// Idle time that must be exceeded before a reminder is eligible.
    pub inactivity_limit: TimeDelta,
    /// Minimum spacing between two reminders. `None` disables the check.
    pub cooldown: Option<TimeDelta>,
}

impl InactivityPolicy {
    pub fn new(inactivity_limit: TimeDelta, cooldown: TimeDelta) -> Self {
        Self {
            inactivity_limit,
            cooldown: Some(cooldown),
        }
    }

    pub fn without_cooldown(inactivity_limit: TimeDelta) -> Self {
        Self {
            inactivity_limit,
            cooldown: None,
        }
    }
}

/// Returns true iff no session is running, the subject has been idle for
/// longer than the limit, and the last reminder (if any) is older than the
/// cooldown.
///
/// A `last_active_at` in the future counts as active. A
/// `last_notification_sent_at` in the future counts as inside the cooldown.
pub fn should_notify(
    now: DateTime<Utc>,
    last_active_at: DateTime<Utc>,
    session_status: SessionStatus,
    last_notification_sent_at: Option<DateTime<Utc>>,
    policy: &InactivityPolicy,
) -> bool {
    if session_status.is_running() {
        return false;
    }

    if last_active_at > now || now - last_active_at <= policy.inactivity_limit {
        return false;
    }

    match (policy.cooldown, last_notification_sent_at) {
        (Some(cooldown), Some(sent_at)) => now - sent_at > cooldown,
        _ => true,
    }
}

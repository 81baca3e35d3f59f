// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-side inactivity sweep.
//!
//! One sweep reads every activity record, picks the subjects that are idle
//! outside a session, and fans out one reminder each. All dispatches run
//! concurrently and are joined before the sweep returns. Individual
//! failures are logged and dropped; the next scheduled sweep is the retry.

use crate::db::ActivityStore;
use crate::error::{AppError, Result};
use crate::models::{NotificationPayload, ReminderTemplate};
use crate::policy::{should_notify, InactivityPolicy};
use crate::services::push::NotificationDispatcher;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Dispatches attempted (one per qualifying subject).
    pub sent: usize,
    /// Attempts the provider rejected or that never reached it.
    pub failed: usize,
    /// Records without a usable subject ID.
    pub skipped: usize,
}

/// A single sweep over the activity store.
pub struct InactivitySweep<'a, S, D> {
    store: &'a S,
    dispatcher: &'a D,
    policy: InactivityPolicy,
    template: &'a ReminderTemplate,
}

impl<'a, S: ActivityStore, D: NotificationDispatcher> InactivitySweep<'a, S, D> {
    pub fn new(
        store: &'a S,
        dispatcher: &'a D,
        policy: InactivityPolicy,
        template: &'a ReminderTemplate,
    ) -> Self {
        Self {
            store,
            dispatcher,
            policy,
            template,
        }
    }

    /// Run the sweep as of `now`.
    ///
    /// Fails only if the store cannot be read or every dispatch failed.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let records = self.store.list_activity_records().await?;
        let scanned = records.len();

        let mut skipped = 0;
        let payloads: Vec<NotificationPayload> = records
            .iter()
            .filter_map(|record| {
                let Some(subject_id) = record.dispatch_target() else {
                    skipped += 1;
                    return None;
                };
                should_notify(
                    now,
                    record.last_active_at,
                    record.session_status,
                    None,
                    &self.policy,
                )
                .then(|| self.template.payload_for(subject_id))
            })
            .collect();

        let outcomes = join_all(payloads.iter().map(|payload| async move {
            (payload, self.dispatcher.dispatch(payload).await)
        }))
        .await;

        let mut failed = 0;
        for (payload, outcome) in outcomes {
            if let Err(e) = outcome {
                failed += 1;
                tracing::warn!(
                    subject_id = payload.targets.first().map(String::as_str).unwrap_or(""),
                    error = %e,
                    "Inactivity reminder dispatch failed"
                );
            }
        }

        let report = SweepReport {
            sent: payloads.len(),
            failed,
            skipped,
        };

        tracing::info!(
            scanned,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            "Inactivity sweep finished"
        );

        if report.sent > 0 && report.failed == report.sent {
            return Err(AppError::PushApi(format!(
                "all {} reminder dispatches failed",
                report.sent
            )));
        }

        Ok(report)
    }
}

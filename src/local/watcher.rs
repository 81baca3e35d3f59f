// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-device inactivity watcher.
//!
//! [`ActivityWatcher`] tracks the last user interaction in memory and, on
//! every poll tick, asks the inactivity policy whether a reminder is due.
//! Session status and the last reminder time are read from the
//! [`LocalStore`], so a restart neither forgets a running Pomodoro nor
//! re-sends a reminder inside the cooldown.
//!
//! Dispatches are spawned and never awaited by the loop, so a failed
//! provider call cannot stall or stop the next tick.
//!
//! # Usage
//!
//! ```rust,ignore
//! let handle = ActivityWatcher::new(config, store, push_client).start();
//! handle.record(ActivitySignal::KeyPress);
//! // ...
//! handle.stop().await;
//! ```

use crate::local::{HttpActivityReporter, LocalStore, LocalStoreError};
use crate::models::{ReminderTemplate, SessionStatus};
use crate::policy::{should_notify, InactivityPolicy};
use crate::services::push::NotificationDispatcher;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Local store key holding the last reminder time.
pub const COOLDOWN_KEY: &str = "notification_cooldown";

/// Local store key holding the current session status.
pub const SESSION_STATUS_KEY: &str = "session_status";

/// An observed user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivitySignal {
    PointerMove,
    KeyPress,
    TouchStart,
}

/// When this device last sent a reminder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCooldownState {
    pub last_notification_sent_at: Option<DateTime<Utc>>,
}

impl NotificationCooldownState {
    /// Record a dispatch at `at`. Older timestamps never replace newer ones.
    pub fn record_dispatch(&mut self, at: DateTime<Utc>) {
        if self.last_notification_sent_at.map_or(true, |prev| at > prev) {
            self.last_notification_sent_at = Some(at);
        }
    }
}

/// Watcher settings.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Push subscriber ID of this device
    pub subject_id: String,
    pub policy: InactivityPolicy,
    pub poll_interval: Duration,
    pub reminder: ReminderTemplate,
}

impl WatcherConfig {
    /// Defaults: remind after an hour idle, at most once an hour, checking
    /// every minute.
    pub fn new(subject_id: impl Into<String>, reminder: ReminderTemplate) -> Self {
        Self {
            subject_id: subject_id.into(),
            policy: InactivityPolicy::new(TimeDelta::minutes(60), TimeDelta::minutes(60)),
            poll_interval: Duration::from_secs(60),
            reminder,
        }
    }

    pub fn with_policy(mut self, policy: InactivityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Wall clock anchored once to the runtime's monotonic clock; never moves
/// backwards.
#[derive(Debug, Clone, Copy)]
struct WatcherClock {
    origin_utc: DateTime<Utc>,
    origin: Instant,
}

impl WatcherClock {
    fn start() -> Self {
        Self {
            origin_utc: Utc::now(),
            origin: Instant::now(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.origin.elapsed()).unwrap_or(TimeDelta::MAX);
        self.origin_utc
            .checked_add_signed(elapsed)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Polls for inactivity and sends reminders through `D`.
pub struct ActivityWatcher<D> {
    config: WatcherConfig,
    store: Arc<LocalStore>,
    dispatcher: Arc<D>,
    reporter: Option<HttpActivityReporter>,
}

impl<D: NotificationDispatcher + 'static> ActivityWatcher<D> {
    pub fn new(config: WatcherConfig, store: Arc<LocalStore>, dispatcher: Arc<D>) -> Self {
        Self {
            config,
            store,
            dispatcher,
            reporter: None,
        }
    }

    /// Also mirror interactions to the server's activity record.
    pub fn with_reporter(mut self, reporter: HttpActivityReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Spawn the watcher loop. Must be called inside a tokio runtime.
    pub fn start(self) -> WatcherHandle {
        let cancel = CancellationToken::new();
        let (signals, signal_rx) = mpsc::unbounded_channel();
        let store = Arc::clone(&self.store);
        let task = tokio::spawn(self.run(signal_rx, cancel.clone()));

        WatcherHandle {
            signals,
            cancel,
            store,
            task: Some(task),
        }
    }

    async fn run(
        self,
        mut signals: mpsc::UnboundedReceiver<ActivitySignal>,
        cancel: CancellationToken,
    ) {
        let clock = WatcherClock::start();
        let mut last_interaction = clock.now();
        let mut last_reported: Option<DateTime<Utc>> = None;

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            subject_id = %self.config.subject_id,
            poll_interval = ?self.config.poll_interval,
            "activity watcher started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("activity watcher stopped");
                    break;
                }
                signal = signals.recv() => {
                    let Some(signal) = signal else {
                        // Handle dropped without stop()
                        break;
                    };
                    last_interaction = clock.now();
                    debug!(?signal, "interaction observed");
                }
                _ = ticker.tick() => {
                    let now = clock.now();
                    self.report_activity(last_interaction, &mut last_reported);
                    if let Err(e) = self.evaluate(now, last_interaction).await {
                        warn!(error = %e, "local store unavailable, skipping tick");
                    }
                }
            }
        }
    }

    /// One poll tick: decide, dispatch without waiting, persist the cooldown.
    async fn evaluate(
        &self,
        now: DateTime<Utc>,
        last_interaction: DateTime<Utc>,
    ) -> Result<(), LocalStoreError> {
        let subject_id = self.config.subject_id.trim();
        if subject_id.is_empty() {
            debug!("no subject id configured, skipping tick");
            return Ok(());
        }

        let store = Arc::clone(&self.store);
        let (status, mut cooldown) = tokio::task::spawn_blocking(move || {
            let status: SessionStatus = store.get(SESSION_STATUS_KEY)?.unwrap_or_default();
            let cooldown: NotificationCooldownState = store.get(COOLDOWN_KEY)?.unwrap_or_default();
            Ok::<_, LocalStoreError>((status, cooldown))
        })
        .await??;

        if !should_notify(
            now,
            last_interaction,
            status,
            cooldown.last_notification_sent_at,
            &self.config.policy,
        ) {
            return Ok(());
        }

        let payload = self.config.reminder.payload_for(subject_id);
        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move {
            if let Err(e) = dispatcher.dispatch(&payload).await {
                warn!(error = %e, "inactivity reminder dispatch failed");
            }
        });

        info!(
            subject_id,
            idle_secs = (now - last_interaction).num_seconds(),
            "inactivity reminder dispatched"
        );

        cooldown.record_dispatch(now);
        let store = Arc::clone(&self.store);
        let persisted =
            tokio::task::spawn_blocking(move || store.put(COOLDOWN_KEY, &cooldown)).await?;
        if let Err(e) = persisted {
            // The next tick will remind again
            error!(error = %e, subject_id, "failed to persist reminder cooldown");
        }
        Ok(())
    }

    /// Forward the latest interaction to the server if it has not been sent.
    fn report_activity(
        &self,
        last_interaction: DateTime<Utc>,
        last_reported: &mut Option<DateTime<Utc>>,
    ) {
        let Some(reporter) = &self.reporter else {
            return;
        };
        if last_reported.is_some_and(|at| at >= last_interaction) {
            return;
        }
        *last_reported = Some(last_interaction);

        let reporter = reporter.clone();
        tokio::spawn(async move {
            if let Err(e) = reporter.report(last_interaction).await {
                warn!(error = %e, "failed to report activity to server");
            }
        });
    }
}

/// Control handle for a running [`ActivityWatcher`].
///
/// Dropping the handle cancels the watcher; [`stop`](Self::stop) also waits
/// for the loop to exit.
pub struct WatcherHandle {
    signals: mpsc::UnboundedSender<ActivitySignal>,
    cancel: CancellationToken,
    store: Arc<LocalStore>,
    task: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    /// Feed an interaction to the watcher. Returns `false` once it has exited.
    pub fn record(&self, signal: ActivitySignal) -> bool {
        self.signals.send(signal).is_ok()
    }

    /// Persist the session status the watcher reads on every tick.
    pub fn set_session_status(&self, status: SessionStatus) -> Result<(), LocalStoreError> {
        self.store.put(SESSION_STATUS_KEY, &status)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the timer and the signal channel and wait for the loop to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "activity watcher task ended abnormally");
            }
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

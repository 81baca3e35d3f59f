// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! LifeMastery reminders: nudge users who have gone idle outside a Pomodoro.
//!
//! This crate provides the backend API (activity tracking and the scheduled
//! inactivity sweep) plus the on-device pieces: the activity watcher and the
//! offline gallery store.

pub mod config;
pub mod db;
pub mod error;
pub mod local;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::PushClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub push: PushClient,
}

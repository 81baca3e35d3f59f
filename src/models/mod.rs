// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod gallery;
pub mod notification;

pub use activity::{ActivityRecord, SessionStatus};
pub use gallery::GalleryItem;
pub use notification::{NotificationPayload, ReminderTemplate};

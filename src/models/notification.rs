// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Outbound reminder notifications.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dedup tag shared by every inactivity reminder, so a device shows at most
/// one of them at a time.
pub const INACTIVITY_REMINDER_TAG: &str = "inactivity-reminder";

/// A notification ready to hand to the push provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NotificationPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
    /// Push subscriber IDs
    #[validate(length(min = 1))]
    pub targets: Vec<String>,
    /// Page opened when the notification is clicked
    #[validate(url)]
    pub url: Option<String>,
    #[validate(url)]
    pub icon: Option<String>,
    /// Dedup identifier; notifications with the same tag replace each other
    pub tag: Option<String>,
    /// Extra data delivered to the client
    pub data: Option<serde_json::Value>,
}

/// Content of an inactivity reminder, addressed per subject at send time.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderTemplate {
    pub title: String,
    pub body: String,
    pub url: Option<String>,
    pub icon: Option<String>,
}

impl Default for ReminderTemplate {
    fn default() -> Self {
        Self {
            title: "Still there?".to_string(),
            body: "You've been away for a while. Start a Pomodoro to get back on track."
                .to_string(),
            url: None,
            icon: None,
        }
    }
}

impl ReminderTemplate {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Build the reminder for a single subscriber.
    pub fn payload_for(&self, subject_id: &str) -> NotificationPayload {
        NotificationPayload {
            title: self.title.clone(),
            body: self.body.clone(),
            targets: vec![subject_id.to_string()],
            url: self.url.clone(),
            icon: self.icon.clone(),
            tag: Some(INACTIVITY_REMINDER_TAG.to_string()),
            data: Some(serde_json::json!({ "kind": INACTIVITY_REMINDER_TAG })),
        }
    }
}

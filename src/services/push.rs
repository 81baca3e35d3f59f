// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push notification API client.
//!
//! Submits notifications to a OneSignal-compatible REST endpoint. A
//! successful call means the provider accepted the request; delivery is
//! the provider's business.

use crate::models::NotificationPayload;
use serde::{Deserialize, Serialize};
use std::future::Future;
use validator::Validate;

/// Push dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid notification: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Push request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Push provider rejected notification (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Anything that can submit a notification to a delivery provider.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(
        &self,
        payload: &NotificationPayload,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// Localized text block (`{"en": "..."}`).
#[derive(Serialize)]
struct LocalizedText<'a> {
    en: &'a str,
}

/// Request body for `POST /notifications`.
#[derive(Serialize)]
struct CreateNotificationRequest<'a> {
    app_id: &'a str,
    include_player_ids: &'a [String],
    headings: LocalizedText<'a>,
    contents: LocalizedText<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chrome_web_icon: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_push_topic: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a serde_json::Value>,
}

/// Relevant part of the provider's response.
///
/// The provider answers 200 with an empty `id` and an `errors` entry when
/// none of the recipients could be targeted.
#[derive(Debug, Default, Deserialize)]
struct CreateNotificationResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

/// Push API client.
#[derive(Clone)]
pub struct PushClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    api_key: String,
}

impl PushClient {
    /// Create a new client for the given provider app and REST key.
    pub fn new(base_url: impl Into<String>, app_id: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_id,
            api_key,
        }
    }

    /// Submit one notification.
    pub async fn send(&self, payload: &NotificationPayload) -> Result<(), DispatchError> {
        payload.validate()?;

        let body = CreateNotificationRequest {
            app_id: &self.app_id,
            include_player_ids: &payload.targets,
            headings: LocalizedText { en: &payload.title },
            contents: LocalizedText { en: &payload.body },
            url: payload.url.as_deref(),
            chrome_web_icon: payload.icon.as_deref(),
            web_push_topic: payload.tag.as_deref(),
            data: payload.data.as_ref(),
        };

        let response = self
            .http
            .post(format!("{}/notifications", self.base_url))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.api_key),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                tracing::warn!("Push provider rate limit hit (429)");
            }
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CreateNotificationResponse = response.json().await.unwrap_or_default();
        let accepted = parsed.id.as_deref().is_some_and(|id| !id.is_empty());
        if !accepted {
            if let Some(errors) = parsed.errors {
                return Err(DispatchError::Rejected {
                    status: status.as_u16(),
                    body: errors.to_string(),
                });
            }
        }

        tracing::debug!(
            recipients = payload.targets.len(),
            notification_id = parsed.id.as_deref().unwrap_or(""),
            "Push notification accepted"
        );
        Ok(())
    }
}

impl NotificationDispatcher for PushClient {
    async fn dispatch(&self, payload: &NotificationPayload) -> Result<(), DispatchError> {
        self.send(payload).await
    }
}

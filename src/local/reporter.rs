// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mirrors on-device activity to the server's activity record.

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct TouchRequest {
    at: DateTime<Utc>,
}

/// Posts last-interaction timestamps to `POST /api/activity`.
#[derive(Clone)]
pub struct HttpActivityReporter {
    http: reqwest::Client,
    endpoint: String,
    session_token: String,
}

impl HttpActivityReporter {
    /// `api_base_url` is the server root; `session_token` is the user's JWT.
    pub fn new(api_base_url: &str, session_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/activity", api_base_url.trim_end_matches('/')),
            session_token,
        }
    }

    /// Report an interaction at `at`.
    pub async fn report(&self, at: DateTime<Utc>) -> anyhow::Result<()> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.session_token)
            .json(&TouchRequest { at })
            .send()
            .await
            .context("activity report request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("activity report rejected (HTTP {}): {}", status, body);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_report_posts_timestamp_with_bearer() {
        let seen: Arc<Mutex<Option<(String, serde_json::Value)>>> = Arc::default();
        let sink = seen.clone();

        let app = Router::new().route(
            "/api/activity",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let sink = sink.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *sink.lock().unwrap() = Some((auth, body));
                    StatusCode::OK
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let reporter = HttpActivityReporter::new(&base, "jwt-abc".to_string());
        let at = Utc.with_ymd_and_hms(2026, 7, 1, 10, 0, 0).unwrap();
        reporter.report(at).await.unwrap();

        let (auth, body) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(auth, "Bearer jwt-abc");
        assert_eq!(body["at"], "2026-07-01T10:00:00Z");
    }

    #[tokio::test]
    async fn test_report_surfaces_rejection() {
        let app = Router::new().route("/api/activity", post(|| async { StatusCode::UNAUTHORIZED }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let reporter = HttpActivityReporter::new(&base, "expired".to_string());
        let err = reporter.report(Utc::now()).await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}

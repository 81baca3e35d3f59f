//! Application configuration loaded from environment variables.
//!
//! Secrets (push API key, JWT signing key, sweep token) are injected by the
//! platform's secret bindings as environment variables and read once at
//! startup. Nothing sensitive has a compiled-in default.

use crate::models::ReminderTemplate;
use crate::policy::InactivityPolicy;
use chrono::TimeDelta;
use std::env;

/// Cloud Scheduler job allowed to trigger the inactivity sweep.
pub const SWEEP_JOB_NAME: &str = "inactivity-sweep";

/// Default push API endpoint (OneSignal REST v1).
pub const DEFAULT_PUSH_API_BASE_URL: &str = "https://onesignal.com/api/v1";

const DEFAULT_SWEEP_INACTIVITY_MINUTES: i64 = 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (CORS origin and default notification link)
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Push provider application ID
    pub push_app_id: String,
    /// Push provider REST base URL
    pub push_api_base_url: String,
    /// Idle time before the sweep reminds a user
    pub sweep_inactivity_limit: TimeDelta,
    /// Content of the reminder sent by the sweep
    pub reminder: ReminderTemplate,

    // --- Secrets ---
    /// Push provider REST API key
    pub push_api_key: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Bearer token the scheduler presents when triggering a sweep
    pub sweep_token: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let sweep_minutes = match env::var("SWEEP_INACTIVITY_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or(ConfigError::Invalid("SWEEP_INACTIVITY_MINUTES"))?,
            Err(_) => DEFAULT_SWEEP_INACTIVITY_MINUTES,
        };

        let notification_url = env::var("NOTIFICATION_URL").unwrap_or_else(|_| frontend_url.clone());

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            push_app_id: env::var("PUSH_APP_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("PUSH_APP_ID"))?,
            push_api_base_url: env::var("PUSH_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PUSH_API_BASE_URL.to_string()),
            sweep_inactivity_limit: TimeDelta::minutes(sweep_minutes),
            reminder: ReminderTemplate::default().with_url(notification_url),
            frontend_url,

            push_api_key: env::var("PUSH_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("PUSH_API_KEY"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            sweep_token: env::var("SWEEP_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SWEEP_TOKEN"))?,
        })
    }

    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            push_app_id: "test-app-id".to_string(),
            push_api_base_url: "http://127.0.0.1:9".to_string(),
            sweep_inactivity_limit: TimeDelta::minutes(DEFAULT_SWEEP_INACTIVITY_MINUTES),
            reminder: ReminderTemplate::default().with_url("http://localhost:5173"),
            push_api_key: "test_push_key".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            sweep_token: "test_sweep_token".to_string(),
        }
    }

    /// Policy used by the server-side sweep. The sweep keeps no per-user
    /// cooldown, so only the idle limit applies.
    pub fn sweep_policy(&self) -> InactivityPolicy {
        InactivityPolicy::without_cooldown(self.sweep_inactivity_limit)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

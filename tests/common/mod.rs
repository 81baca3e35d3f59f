// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use lifemastery_reminders::config::Config;
use lifemastery_reminders::db::FirestoreDb;
use lifemastery_reminders::middleware::auth::create_jwt;
use lifemastery_reminders::routes::create_router;
use lifemastery_reminders::services::PushClient;
use lifemastery_reminders::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = FirestoreDb::new_mock();
    let push = PushClient::new(
        config.push_api_base_url.clone(),
        config.push_app_id.clone(),
        config.push_api_key.clone(),
    );

    let state = Arc::new(AppState { config, db, push });

    (create_router(state.clone()), state)
}

/// Create a test app over a real database, sending pushes to `push_base_url`.
#[allow(dead_code)]
pub fn create_test_app_with(
    db: FirestoreDb,
    push_base_url: &str,
) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.push_api_base_url = push_base_url.to_string();
    let push = PushClient::new(
        config.push_api_base_url.clone(),
        config.push_app_id.clone(),
        config.push_api_key.clone(),
    );

    let state = Arc::new(AppState { config, db, push });

    (create_router(state.clone()), state)
}

/// Session JWT for `subject_id`, signed with the test key.
#[allow(dead_code)]
pub fn test_jwt(state: &AppState, subject_id: &str) -> String {
    create_jwt(subject_id, &state.config.jwt_signing_key).unwrap()
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST` set). They are skipped otherwise.

use chrono::{TimeDelta, TimeZone, Utc};
use lifemastery_reminders::models::SessionStatus;

mod common;
use common::test_db;

/// Generate a unique subject ID for test isolation.
fn unique_subject_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

#[tokio::test]
async fn test_touch_creates_record() {
    require_emulator!();

    let db = test_db().await;
    let subject = unique_subject_id("touch");
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

    let before = db.get_activity_record(&subject).await.unwrap();
    assert!(before.is_none(), "Record should not exist before first touch");

    let record = db.touch_activity(&subject, at).await.unwrap();
    assert_eq!(record.last_active_at, at);
    assert_eq!(record.session_status, SessionStatus::Stopped);

    let stored = db.get_activity_record(&subject).await.unwrap().unwrap();
    assert_eq!(stored.subject_id.as_deref(), Some(subject.as_str()));
    assert_eq!(stored.last_active_at, at);
}

#[tokio::test]
async fn test_touch_never_moves_backwards() {
    require_emulator!();

    let db = test_db().await;
    let subject = unique_subject_id("monotonic");
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

    db.touch_activity(&subject, at).await.unwrap();
    let record = db
        .touch_activity(&subject, at - TimeDelta::minutes(5))
        .await
        .unwrap();
    assert_eq!(record.last_active_at, at);

    let later = at + TimeDelta::minutes(5);
    db.touch_activity(&subject, later).await.unwrap();
    let stored = db.get_activity_record(&subject).await.unwrap().unwrap();
    assert_eq!(stored.last_active_at, later);
}

#[tokio::test]
async fn test_session_status_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let subject = unique_subject_id("status");
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

    db.touch_activity(&subject, at).await.unwrap();
    let record = db
        .set_session_status(&subject, SessionStatus::Running, at + TimeDelta::hours(1))
        .await
        .unwrap();

    assert_eq!(record.session_status, SessionStatus::Running);
    // A status change is not an interaction
    assert_eq!(record.last_active_at, at);

    let stored = db.get_activity_record(&subject).await.unwrap().unwrap();
    assert_eq!(stored.session_status, SessionStatus::Running);
}

#[tokio::test]
async fn test_list_includes_touched_subject() {
    require_emulator!();

    let db = test_db().await;
    let subject = unique_subject_id("list");

    db.touch_activity(&subject, Utc::now()).await.unwrap();

    let records = db.list_activity_records().await.unwrap();
    assert!(records
        .iter()
        .any(|r| r.subject_id.as_deref() == Some(subject.as_str())));
}

#[tokio::test]
async fn test_concurrent_touch_keeps_running_status() {
    require_emulator!();

    let db = test_db().await;
    let subject = unique_subject_id("race");
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    db.touch_activity(&subject, at).await.unwrap();

    let (touched, started) = tokio::join!(
        db.touch_activity(&subject, at + TimeDelta::minutes(1)),
        db.set_session_status(&subject, SessionStatus::Running, at + TimeDelta::minutes(1)),
    );
    touched.unwrap();
    started.unwrap();

    let stored = db.get_activity_record(&subject).await.unwrap().unwrap();
    assert_eq!(stored.session_status, SessionStatus::Running);
    assert_eq!(stored.last_active_at, at + TimeDelta::minutes(1));
}

#[tokio::test]
async fn test_concurrent_touches_keep_newest_timestamp() {
    require_emulator!();

    let db = test_db().await;
    let subject = unique_subject_id("touches");
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    db.touch_activity(&subject, at).await.unwrap();

    let touches = (1..=5).rev().map(|m| db.touch_activity(&subject, at + TimeDelta::minutes(m)));
    for result in futures_util::future::join_all(touches).await {
        result.unwrap();
    }

    let stored = db.get_activity_record(&subject).await.unwrap().unwrap();
    assert_eq!(stored.last_active_at, at + TimeDelta::minutes(5));
}

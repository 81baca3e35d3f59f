// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations on activity records.

use crate::db::{collections, ActivityStore};
use crate::error::AppError;
use crate::models::{ActivityRecord, SessionStatus};
use chrono::{DateTime, Utc};
use firestore::errors::BackoffError;
use firestore::{paths, FirestoreResult, FirestoreTransaction};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts any token, so skip the credential lookup.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Get the activity record for a subject.
    pub async fn get_activity_record(
        &self,
        subject_id: &str,
    ) -> Result<Option<ActivityRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACTIVITY)
            .obj()
            .one(subject_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Read every activity record.
    pub async fn list_activity_records(&self) -> Result<Vec<ActivityRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITY)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record an interaction at `at`, creating the record on first activity.
    ///
    /// Runs in a transaction that writes only `last_active_at` (and a
    /// missing `subject_id`), so a concurrent status change survives and
    /// `last_active_at` never moves backwards. Firestore retries the
    /// transaction when a concurrent write touches the same document.
    pub async fn touch_activity(
        &self,
        subject_id: &str,
        at: DateTime<Utc>,
    ) -> Result<ActivityRecord, AppError> {
        let subject_id = subject_id.to_string();
        self.get_client()?
            .run_transaction(|db, transaction| {
                let subject_id = subject_id.clone();
                Box::pin(async move {
                    touch_in_transaction(&db, transaction, &subject_id, at)
                        .await
                        .map_err(BackoffError::permanent)
                })
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set whether a timed session is running for a subject.
    ///
    /// Writes only `session_status` (and a missing `subject_id`) inside a
    /// transaction, so it never rolls back a concurrent touch.
    pub async fn set_session_status(
        &self,
        subject_id: &str,
        status: SessionStatus,
        now: DateTime<Utc>,
    ) -> Result<ActivityRecord, AppError> {
        let subject_id = subject_id.to_string();
        let record = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let subject_id = subject_id.clone();
                Box::pin(async move {
                    set_status_in_transaction(&db, transaction, &subject_id, status, now)
                        .await
                        .map_err(BackoffError::permanent)
                })
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(subject_id = %subject_id, status = ?status, "Session status updated");
        Ok(record)
    }
}

/// Read one activity record inside the transaction bound to `db`.
async fn read_in_transaction(
    db: &firestore::FirestoreDb,
    subject_id: &str,
) -> FirestoreResult<Option<ActivityRecord>> {
    db.fluent()
        .select()
        .by_id_in(collections::ACTIVITY)
        .obj()
        .one(subject_id)
        .await
}

/// Queue a write of `record`. With `fields`, only those fields are written;
/// without, the whole document is created.
fn write_in_transaction(
    db: &firestore::FirestoreDb,
    transaction: &mut FirestoreTransaction<'_>,
    subject_id: &str,
    record: &ActivityRecord,
    fields: Option<Vec<String>>,
) -> FirestoreResult<()> {
    let update = db.fluent().update();
    let update = match fields {
        Some(fields) => update.fields(fields),
        None => update,
    };
    update
        .in_col(collections::ACTIVITY)
        .document_id(subject_id)
        .object(record)
        .add_to_transaction(transaction)?;
    Ok(())
}

async fn touch_in_transaction(
    db: &firestore::FirestoreDb,
    transaction: &mut FirestoreTransaction<'_>,
    subject_id: &str,
    at: DateTime<Utc>,
) -> FirestoreResult<ActivityRecord> {
    let Some(mut record) = read_in_transaction(db, subject_id).await? else {
        tracing::info!(subject_id, "Creating activity record");
        let record = ActivityRecord::new(subject_id, at);
        write_in_transaction(db, transaction, subject_id, &record, None)?;
        return Ok(record);
    };

    // Backfill the address on documents written before it was stored
    let backfill = record.subject_id.is_none();
    if backfill {
        record.subject_id = Some(subject_id.to_string());
    }
    if !record.touch(at) && !backfill {
        tracing::debug!(subject_id, "Stale activity timestamp ignored");
        return Ok(record);
    }

    write_in_transaction(
        db,
        transaction,
        subject_id,
        &record,
        Some(paths!(ActivityRecord::{subject_id, last_active_at})),
    )?;
    Ok(record)
}

async fn set_status_in_transaction(
    db: &firestore::FirestoreDb,
    transaction: &mut FirestoreTransaction<'_>,
    subject_id: &str,
    status: SessionStatus,
    now: DateTime<Utc>,
) -> FirestoreResult<ActivityRecord> {
    let Some(mut record) = read_in_transaction(db, subject_id).await? else {
        let mut record = ActivityRecord::new(subject_id, now);
        record.session_status = status;
        write_in_transaction(db, transaction, subject_id, &record, None)?;
        return Ok(record);
    };

    if record.subject_id.is_none() {
        record.subject_id = Some(subject_id.to_string());
    }
    record.session_status = status;

    write_in_transaction(
        db,
        transaction,
        subject_id,
        &record,
        Some(paths!(ActivityRecord::{subject_id, session_status})),
    )?;
    Ok(record)
}

impl ActivityStore for FirestoreDb {
    async fn list_activity_records(&self) -> Result<Vec<ActivityRecord>, AppError> {
        FirestoreDb::list_activity_records(self).await
    }
}

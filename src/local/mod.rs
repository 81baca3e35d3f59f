// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-device components: a durable key-value store and what runs on it.
//!
//! The store is a single SQLite table of string keys and JSON values. Each
//! key is written independently; there are no multi-key transactions and
//! concurrent writers to one key are last-write-wins.

pub mod gallery;
pub mod reporter;
pub mod watcher;

pub use gallery::GalleryStore;
pub use reporter::HttpActivityReporter;
pub use watcher::{ActivitySignal, ActivityWatcher, WatcherConfig, WatcherHandle};

use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Local store errors.
#[derive(Debug, thiserror::Error)]
pub enum LocalStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt value for key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Local store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Durable key-value store backed by SQLite.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LocalStoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "Opened local store");
        Self::init(conn)
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self, LocalStoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, LocalStoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Read and decode the value at `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, LocalStoreError> {
        let raw: Option<String> = self
            .conn()
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;

        raw.map(|raw| {
            serde_json::from_str(&raw).map_err(|source| LocalStoreError::Decode {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
    }

    /// Create or overwrite the value at `key`.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), LocalStoreError> {
        let raw = serde_json::to_string(value)?;
        self.conn().execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, raw],
        )?;
        Ok(())
    }

    /// Remove `key`. Returns whether it existed.
    pub fn delete(&self, key: &str) -> Result<bool, LocalStoreError> {
        let removed = self
            .conn()
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    /// All keys starting with `prefix`, in key order.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, LocalStoreError> {
        let conn = self.conn();
        // substr() instead of LIKE so '%' and '_' in prefixes match literally
        let mut stmt = conn.prepare(
            "SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

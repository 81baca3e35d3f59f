// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User-authored gallery items kept in the offline store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One gallery entry. Everything beyond the identity fields is free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    pub subject_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl GalleryItem {
    /// JSON keys a partial update may not overwrite.
    pub const IDENTITY_KEYS: [&'static str; 3] = ["id", "subjectId", "createdAt"];

    pub fn new(
        id: impl Into<String>,
        subject_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            subject_id: subject_id.into(),
            created_at,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Merge `patch` over the free-form fields. Identity keys are ignored.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            if Self::IDENTITY_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.fields.insert(key, value);
        }
    }
}

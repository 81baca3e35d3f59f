// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Offline gallery of user-authored items.
//!
//! Items live in the local store under `<namespace>_<subject_id>_<item_id>`.
//! Lookups list the subject's keys and filter; ordering (newest first) is
//! applied on every read rather than stored.

use crate::local::{LocalStore, LocalStoreError};
use crate::models::GalleryItem;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Default namespace for gallery keys.
pub const DEFAULT_NAMESPACE: &str = "gallery";

/// Namespaced gallery on top of a [`LocalStore`].
#[derive(Clone)]
pub struct GalleryStore {
    store: Arc<LocalStore>,
    namespace: String,
}

impl GalleryStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(store: Arc<LocalStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    fn subject_prefix(&self, subject_id: &str) -> String {
        format!("{}_{}_", self.namespace, subject_id)
    }

    fn key(&self, subject_id: &str, item_id: &str) -> String {
        format!("{}{}", self.subject_prefix(subject_id), item_id)
    }

    /// Create or overwrite an item.
    pub fn save(&self, item: &GalleryItem) -> Result<(), LocalStoreError> {
        self.store.put(&self.key(&item.subject_id, &item.id), item)
    }

    /// All of a subject's items, newest first.
    pub fn list(&self, subject_id: &str) -> Result<Vec<GalleryItem>, LocalStoreError> {
        let mut items = Vec::new();
        for key in self.store.keys_with_prefix(&self.subject_prefix(subject_id))? {
            let Some(item) = self.store.get::<GalleryItem>(&key)? else {
                continue;
            };
            // "a_b" under subject "a" shares the prefix of subject "a_b"
            if item.subject_id == subject_id {
                items.push(item);
            }
        }

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Point lookup among a subject's items.
    pub fn get(
        &self,
        subject_id: &str,
        item_id: &str,
    ) -> Result<Option<GalleryItem>, LocalStoreError> {
        Ok(self
            .list(subject_id)?
            .into_iter()
            .find(|item| item.id == item_id))
    }

    /// Merge `patch` over an existing item. Returns the updated item, or
    /// `None` if there was nothing to update.
    pub fn update(
        &self,
        subject_id: &str,
        item_id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<GalleryItem>, LocalStoreError> {
        let Some(mut item) = self.get(subject_id, item_id)? else {
            return Ok(None);
        };
        item.merge(patch);
        self.save(&item)?;
        Ok(Some(item))
    }

    /// Remove an item. Returns whether it existed.
    pub fn delete(&self, subject_id: &str, item_id: &str) -> Result<bool, LocalStoreError> {
        self.store.delete(&self.key(subject_id, item_id))
    }
}

// ABOUTME: Editing session wiring store, change tracker and batch persister together
// ABOUTME: Load, edit, save and reconcile in the order the admin dashboard drives them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::persister::{BatchPersister, CommitOptions};
use super::renderer::SettingValue;
use super::store::{SettingsStore, Snapshot};
use super::table::SettingsTable;
use super::tracker::ChangeTracker;
use super::types::{BatchResult, EditState, SettingView};
use crate::assets::{AssetPipeline, UploadConstraints};
use crate::errors::{EditError, LoadError, ValidationError};
use std::collections::HashMap;
use std::future::{self, Future};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One admin's editing session over the site settings
///
/// Reconciliation only ever runs after a commit has fully resolved, and never
/// after a cancelled one.
pub struct SettingsEditor {
    store: Arc<SettingsStore>,
    tracker: ChangeTracker,
    persister: BatchPersister,
}

impl SettingsEditor {
    /// Session over `table`
    #[must_use]
    pub fn new(table: Arc<dyn SettingsTable>, load_timeout: Duration, options: CommitOptions) -> Self {
        let store = Arc::new(SettingsStore::new(Arc::clone(&table), load_timeout));
        Self {
            tracker: ChangeTracker::new(Arc::clone(&store)),
            persister: BatchPersister::new(table, options),
            store,
        }
    }

    /// Apply number defaults to empty number edits
    #[must_use]
    pub fn with_defaults(mut self, defaults: HashMap<String, String>) -> Self {
        self.tracker = self.tracker.with_defaults(defaults);
        self
    }

    /// Shared store of this session
    #[must_use]
    pub const fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    /// Edit buffer of this session
    #[must_use]
    pub const fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    /// Reload the table and drop edits the new baseline made stale
    ///
    /// Returns the keys whose edits were dropped.
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` when the load fails; snapshot and buffer are kept
    pub async fn refresh(&mut self) -> Result<Vec<String>, LoadError> {
        self.refresh_or_cancel(future::pending()).await
    }

    /// Like [`refresh`](Self::refresh), abandoned when `cancel` resolves
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Cancelled` on cancellation, otherwise as `refresh`
    pub async fn refresh_or_cancel<C>(&mut self, cancel: C) -> Result<Vec<String>, LoadError>
    where
        C: Future<Output = ()> + Send,
    {
        self.store.load_or_cancel(cancel).await?;
        Ok(self.tracker.rebase())
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    /// Buffer a raw edit
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for an unknown key or invalid input
    pub fn edit(&mut self, key: &str, raw: &str) -> Result<EditState, ValidationError> {
        self.tracker.set_edit(key, raw)
    }

    /// Buffer a typed edit
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when the value does not fit the setting
    pub fn edit_value(&mut self, key: &str, value: &SettingValue) -> Result<EditState, ValidationError> {
        self.tracker.set_value(key, value)
    }

    /// Upload an image and buffer its URL
    ///
    /// # Errors
    ///
    /// Returns an `EditError` when the key is not an image setting or the upload fails
    pub async fn upload_image<P>(
        &mut self,
        key: &str,
        bytes: &[u8],
        mime: &str,
        pipeline: &P,
        constraints: &UploadConstraints,
    ) -> Result<EditState, EditError>
    where
        P: AssetPipeline + ?Sized,
    {
        self.tracker
            .set_image(key, bytes, mime, pipeline, constraints)
            .await
    }

    /// Drop the edit of `key`
    pub fn revert(&mut self, key: &str) -> Option<String> {
        self.tracker.revert(key)
    }

    /// Drop every edit
    pub fn revert_all(&mut self) {
        self.tracker.revert_all();
    }

    /// Commit the pending diff and reconcile what saved
    ///
    /// Failed keys stay dirty so they can be saved again.
    pub async fn save(&mut self) -> BatchResult {
        self.save_or_cancel(future::pending()).await
    }

    /// Like [`save`](Self::save), stopped when `cancel` resolves
    ///
    /// A cancelled save reconciles nothing; every edit stays dirty.
    pub async fn save_or_cancel<C>(&mut self, cancel: C) -> BatchResult
    where
        C: Future<Output = ()> + Send,
    {
        let diff = self.tracker.diff().clone();
        let result = self.persister.commit_or_cancel(&diff, cancel).await;

        if result.was_cancelled() {
            info!(
                pending = self.tracker.diff().len(),
                "Save cancelled, edits kept for retry"
            );
        } else {
            self.tracker.reconcile(&result);
        }
        result
    }

    /// Editor rows of `category`
    #[must_use]
    pub fn view(&self, category: &str) -> Vec<SettingView> {
        self.tracker.view(category)
    }

    /// Editor rows grouped by category
    #[must_use]
    pub fn view_all(&self) -> Vec<(String, Vec<SettingView>)> {
        self.tracker.view_all()
    }
}

// ABOUTME: Change tracker buffering uncommitted edits against the store baseline
// ABOUTME: Single source of truth for dirty state, diffing, revert and post-commit reconciliation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::renderer::{SettingValue, ValueRenderer};
use super::store::SettingsStore;
use super::types::{BatchResult, Diff, EditState, Setting, SettingType, SettingView};
use crate::assets::{AssetPipeline, UploadConstraints};
use crate::errors::{EditError, ValidationError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Local buffer of edits not yet committed
///
/// The buffer only ever holds canonical values that differ from the baseline,
/// so `diff()` is the buffer itself. One tracker belongs to one editing session.
pub struct ChangeTracker {
    store: Arc<SettingsStore>,
    buffer: Diff,
    defaults: HashMap<String, String>,
}

impl ChangeTracker {
    /// Tracker with an empty buffer over `store`
    #[must_use]
    pub fn new(store: Arc<SettingsStore>) -> Self {
        Self {
            store,
            buffer: Diff::new(),
            defaults: HashMap::new(),
        }
    }

    /// Use `defaults` (key to canonical value) when a number edit is left empty
    #[must_use]
    pub fn with_defaults(mut self, defaults: HashMap<String, String>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Store the tracker diffs against
    #[must_use]
    pub const fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    /// Validate and buffer a raw edit
    ///
    /// An edit equal to the baseline clears any buffered value for the key.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for an unknown key or invalid input; the
    /// buffer is left unchanged
    pub fn set_edit(&mut self, key: &str, raw: &str) -> Result<EditState, ValidationError> {
        let setting = self.baseline(key)?;
        let encoded = self.renderer(&setting).encode(key, raw)?;
        Ok(self.buffer_encoded(&setting, encoded))
    }

    /// Validate and buffer a typed edit
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::TypeMismatch` when the value's type differs from
    /// the setting's, or any validation error of the type
    pub fn set_value(&mut self, key: &str, value: &SettingValue) -> Result<EditState, ValidationError> {
        let setting = self.baseline(key)?;
        let encoded = self.renderer(&setting).encode_value(key, value)?;
        Ok(self.buffer_encoded(&setting, encoded))
    }

    /// Upload an image through `pipeline` and buffer the returned URL
    ///
    /// The key is checked before any bytes are sent. A rejected upload leaves
    /// the buffer untouched.
    ///
    /// # Errors
    ///
    /// Returns `EditError::Validation` for an unknown or non-image key and
    /// `EditError::Upload` when the pipeline refuses the file
    pub async fn set_image<P>(
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
        let setting = self.baseline(key)?;
        if setting.setting_type != SettingType::Image {
            return Err(ValidationError::TypeMismatch {
                key: key.to_owned(),
                expected: setting.setting_type.as_str(),
                provided: SettingType::Image.as_str(),
            }
            .into());
        }

        let url = pipeline.upload(bytes, mime, constraints).await?;
        debug!(key, url = %url, "Image uploaded");
        Ok(self.buffer_encoded(&setting, url))
    }

    /// Pending changes, key to canonical value
    #[must_use]
    pub const fn diff(&self) -> &Diff {
        &self.buffer
    }

    /// Whether anything is waiting to be saved
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Keys with a buffered edit, sorted
    #[must_use]
    pub fn dirty_keys(&self) -> Vec<String> {
        self.buffer.keys().cloned().collect()
    }

    /// Edit state of `key`; unknown keys are clean
    #[must_use]
    pub fn state(&self, key: &str) -> EditState {
        if self.buffer.contains_key(key) {
            EditState::Dirty
        } else {
            EditState::Clean
        }
    }

    /// Value the editor shows: the buffered edit, else the baseline
    #[must_use]
    pub fn displayed_value(&self, key: &str) -> Option<String> {
        self.buffer
            .get(key)
            .cloned()
            .or_else(|| self.store.get(key).map(|setting| setting.value))
    }

    /// Drop the buffered edit for `key`, returning it
    pub fn revert(&mut self, key: &str) -> Option<String> {
        let reverted = self.buffer.remove(key);
        if reverted.is_some() {
            debug!(key, "Edit reverted");
        }
        reverted
    }

    /// Drop every buffered edit
    pub fn revert_all(&mut self) {
        if !self.buffer.is_empty() {
            debug!(count = self.buffer.len(), "All edits reverted");
        }
        self.buffer.clear();
    }

    /// Apply a finished commit
    ///
    /// Each committed key moves the store baseline to the written value. Its
    /// buffer entry is dropped only if it still holds that value; an edit made
    /// while the commit was running stays dirty. Failed keys are not touched.
    pub fn reconcile(&mut self, result: &BatchResult) {
        let mut cleared = 0_usize;
        for (key, committed) in &result.committed {
            self.store.apply_committed(key, committed);
            if self.buffer.get(key) == Some(&committed.value) {
                self.buffer.remove(key);
                cleared += 1;
            }
        }
        info!(
            committed = result.committed.len(),
            cleared,
            still_dirty = self.buffer.len(),
            "Reconciled commit"
        );
    }

    /// Re-check buffered edits against a freshly loaded baseline
    ///
    /// Drops edits whose key vanished, that now equal the baseline, or that no
    /// longer validate under the key's current type. Returns the dropped keys.
    pub fn rebase(&mut self) -> Vec<String> {
        let snapshot = self.store.snapshot();
        let mut dropped = Vec::new();
        let mut kept = Diff::new();

        for (key, value) in std::mem::take(&mut self.buffer) {
            let Some(setting) = snapshot.get(&key) else {
                dropped.push(key);
                continue;
            };
            match self.renderer(setting).encode(&key, &value) {
                Ok(encoded) if encoded != setting.value => {
                    kept.insert(key, encoded);
                }
                _ => dropped.push(key),
            }
        }

        self.buffer = kept;
        if !dropped.is_empty() {
            info!(dropped = ?dropped, "Discarded stale edits after reload");
        }
        dropped
    }

    /// Editor rows of `category`, in load order
    #[must_use]
    pub fn view(&self, category: &str) -> Vec<SettingView> {
        self.store
            .get_by_category(category)
            .into_iter()
            .map(|setting| self.view_of(setting))
            .collect()
    }

    /// Editor rows for every setting, grouped by category in load order
    #[must_use]
    pub fn view_all(&self) -> Vec<(String, Vec<SettingView>)> {
        self.store
            .categories()
            .into_iter()
            .map(|category| {
                let views = category
                    .settings
                    .into_iter()
                    .map(|setting| self.view_of(setting))
                    .collect();
                (category.name, views)
            })
            .collect()
    }

    fn view_of(&self, setting: Setting) -> SettingView {
        match self.buffer.get(&setting.key) {
            Some(pending) => SettingView {
                displayed_value: pending.clone(),
                state: EditState::Dirty,
                setting,
            },
            None => SettingView {
                displayed_value: setting.value.clone(),
                state: EditState::Clean,
                setting,
            },
        }
    }

    fn baseline(&self, key: &str) -> Result<Setting, ValidationError> {
        self.store
            .get(key)
            .ok_or_else(|| ValidationError::UnknownKey {
                key: key.to_owned(),
            })
    }

    fn renderer(&self, setting: &Setting) -> ValueRenderer {
        ValueRenderer::for_setting(setting, self.defaults.get(&setting.key).map(String::as_str))
    }

    fn buffer_encoded(&mut self, setting: &Setting, encoded: String) -> EditState {
        if encoded == setting.value {
            if self.buffer.remove(&setting.key).is_some() {
                debug!(key = %setting.key, "Edit returned to baseline");
            }
            EditState::Clean
        } else {
            debug!(key = %setting.key, "Edit buffered");
            self.buffer.insert(setting.key.clone(), encoded);
            EditState::Dirty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CommitError, TableError, UploadError};
    use crate::settings::types::{CommittedValue, SettingRow};
    use crate::test_utils::{sample_rows, MemoryTable};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;

    async fn tracker_over(table: Arc<MemoryTable>) -> ChangeTracker {
        let store = Arc::new(SettingsStore::new(table, Duration::from_secs(5)));
        store.load().await.unwrap();
        ChangeTracker::new(store)
    }

    async fn tracker() -> ChangeTracker {
        tracker_over(Arc::new(MemoryTable::new(sample_rows()))).await
    }

    fn committed(value: &str) -> CommittedValue {
        CommittedValue {
            value: value.to_owned(),
            updated_at: Utc::now(),
        }
    }

    struct FixedPipeline(Result<String, UploadError>);

    #[async_trait]
    impl AssetPipeline for FixedPipeline {
        async fn upload(
            &self,
            _bytes: &[u8],
            _mime: &str,
            _constraints: &UploadConstraints,
        ) -> Result<String, UploadError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_edit_back_to_baseline_clears_dirty_state() {
        let mut tracker = tracker().await;

        assert_eq!(tracker.set_edit("site.title", "New Clinic").unwrap(), EditState::Dirty);
        assert_eq!(tracker.state("site.title"), EditState::Dirty);
        assert_eq!(tracker.set_edit("site.title", "Clinic").unwrap(), EditState::Clean);

        assert!(!tracker.diff().contains_key("site.title"));
        assert!(!tracker.has_changes());
    }

    #[tokio::test]
    async fn test_equivalent_encoding_is_not_a_change() {
        let mut tracker = tracker().await;

        tracker.set_edit("appearance.primary_color", "#0A7CFF").unwrap();
        tracker.set_edit("booking.slot_minutes", "030").unwrap();
        tracker.set_edit("booking.online_enabled", "ON").unwrap();

        assert!(tracker.diff().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_edit_leaves_buffer_unchanged() {
        let mut tracker = tracker().await;
        tracker.set_edit("site.title", "New Clinic").unwrap();
        let before = tracker.diff().clone();

        let err = tracker
            .set_edit("appearance.primary_color", "blue")
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidColor { .. }));
        assert!(tracker.set_edit("booking.slot_minutes", "half an hour").is_err());
        assert_eq!(
            tracker.set_edit("site.unknown", "x").unwrap_err(),
            ValidationError::UnknownKey {
                key: "site.unknown".to_owned()
            }
        );

        assert_eq!(tracker.diff(), &before);
    }

    #[tokio::test]
    async fn test_buffer_holds_canonical_values() {
        let mut tracker = tracker().await;
        tracker.set_edit("appearance.primary_color", "F0A").unwrap();
        tracker.set_edit("booking.slot_minutes", " 45.0 ").unwrap();

        assert_eq!(
            tracker.diff().get("appearance.primary_color").map(String::as_str),
            Some("#ff00aa")
        );
        assert_eq!(
            tracker.diff().get("booking.slot_minutes").map(String::as_str),
            Some("45")
        );
    }

    #[tokio::test]
    async fn test_empty_number_uses_default() {
        let store = Arc::new(SettingsStore::new(
            Arc::new(MemoryTable::new(sample_rows())),
            Duration::from_secs(5),
        ));
        store.load().await.unwrap();
        let mut tracker = ChangeTracker::new(store).with_defaults(HashMap::from([(
            "booking.slot_minutes".to_owned(),
            "20".to_owned(),
        )]));

        tracker.set_edit("booking.slot_minutes", "").unwrap();
        assert_eq!(
            tracker.displayed_value("booking.slot_minutes").as_deref(),
            Some("20")
        );
    }

    #[tokio::test]
    async fn test_typed_value_of_wrong_type_is_rejected() {
        let mut tracker = tracker().await;

        let err = tracker
            .set_value("appearance.primary_color", &SettingValue::Text("red".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));

        tracker
            .set_value("appearance.primary_color", &SettingValue::Color([255, 0, 0]))
            .unwrap();
        assert_eq!(
            tracker.displayed_value("appearance.primary_color").as_deref(),
            Some("#ff0000")
        );
    }

    #[tokio::test]
    async fn test_revert_restores_baseline() {
        let mut tracker = tracker().await;
        tracker.set_edit("site.title", "New Clinic").unwrap();
        tracker.set_edit("site.about", "Walk-ins welcome.").unwrap();

        assert_eq!(tracker.revert("site.title").as_deref(), Some("New Clinic"));
        assert_eq!(tracker.displayed_value("site.title").as_deref(), Some("Clinic"));
        assert_eq!(tracker.dirty_keys(), vec!["site.about".to_owned()]);

        tracker.revert_all();
        assert!(tracker.diff().is_empty());
        assert!(tracker.revert("site.about").is_none());
    }

    #[tokio::test]
    async fn test_reconcile_keeps_failed_and_newer_edits() {
        let mut tracker = tracker().await;
        tracker.set_edit("site.title", "New Clinic").unwrap();
        tracker.set_edit("site.about", "Walk-ins welcome.").unwrap();
        tracker.set_edit("booking.slot_minutes", "45").unwrap();

        let mut result = BatchResult::default();
        result
            .committed
            .insert("site.title".to_owned(), committed("New Clinic"));
        result
            .committed
            .insert("booking.slot_minutes".to_owned(), committed("45"));
        result.failed.insert(
            "site.about".to_owned(),
            CommitError::Table(TableError::Unavailable("timeout".to_owned())),
        );
        // edited again while the commit was running
        tracker.set_edit("booking.slot_minutes", "50").unwrap();

        tracker.reconcile(&result);

        let store = Arc::clone(tracker.store());
        assert_eq!(store.get("site.title").unwrap().value, "New Clinic");
        assert_eq!(store.get("booking.slot_minutes").unwrap().value, "45");
        assert_eq!(store.get("site.about").unwrap().value, "Family practice since 1998.");
        assert_eq!(
            tracker.dirty_keys(),
            vec!["booking.slot_minutes".to_owned(), "site.about".to_owned()]
        );
        assert_eq!(
            tracker.diff().get("site.about").map(String::as_str),
            Some("Walk-ins welcome.")
        );
    }

    #[tokio::test]
    async fn test_rebase_drops_stale_edits() {
        let table = Arc::new(MemoryTable::new(sample_rows()));
        let mut tracker = tracker_over(Arc::clone(&table)).await;
        tracker.set_edit("site.title", "New Clinic").unwrap();
        tracker.set_edit("site.about", "Walk-ins welcome.").unwrap();
        tracker.set_edit("booking.slot_minutes", "45").unwrap();
        tracker.set_edit("booking.online_enabled", "false").unwrap();

        let mut rows = sample_rows();
        // another session already saved the same title
        rows[0].value = Some("New Clinic".to_owned());
        // slot length migrated from number to boolean
        rows[4] = SettingRow::new(
            "booking.slot_minutes",
            "Fixed slots",
            "booking",
            SettingType::Boolean,
            "true",
        );
        rows.retain(|row| row.key != "site.about");
        table.replace_rows(rows);
        tracker.store().load().await.unwrap();

        let mut dropped = tracker.rebase();
        dropped.sort();

        assert_eq!(
            dropped,
            vec![
                "booking.slot_minutes".to_owned(),
                "site.about".to_owned(),
                "site.title".to_owned()
            ]
        );
        assert_eq!(tracker.dirty_keys(), vec!["booking.online_enabled".to_owned()]);
    }

    #[tokio::test]
    async fn test_view_marks_dirty_rows() {
        let mut tracker = tracker().await;
        tracker.set_edit("appearance.primary_color", "#000").unwrap();

        let rows = tracker.view("appearance");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].state, EditState::Dirty);
        assert_eq!(rows[0].displayed_value, "#000000");
        assert_eq!(rows[0].setting.value, "#0a7cff");
        assert_eq!(rows[1].state, EditState::Clean);

        let names: Vec<_> = tracker.view_all().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["general", "appearance", "booking"]);
    }

    #[tokio::test]
    async fn test_image_upload_buffers_returned_url() {
        let mut tracker = tracker().await;
        let pipeline = FixedPipeline(Ok("/assets/abc.png".to_owned()));

        let state = tracker
            .set_image("appearance.logo", b"png", "image/png", &pipeline, &UploadConstraints::default())
            .await
            .unwrap();

        assert_eq!(state, EditState::Dirty);
        assert_eq!(
            tracker.diff().get("appearance.logo").map(String::as_str),
            Some("/assets/abc.png")
        );
    }

    #[tokio::test]
    async fn test_rejected_upload_creates_no_edit() {
        let mut tracker = tracker().await;
        let pipeline = FixedPipeline(Err(UploadError::TooLarge { size: 10, max: 5 }));

        let err = tracker
            .set_image("appearance.logo", b"png", "image/png", &pipeline, &UploadConstraints::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EditError::Upload(UploadError::TooLarge { .. })));

        let err = tracker
            .set_image("site.title", b"png", "image/png", &pipeline, &UploadConstraints::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::Validation(ValidationError::TypeMismatch { .. })
        ));
        assert!(tracker.diff().is_empty());
    }
}

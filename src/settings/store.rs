// ABOUTME: Settings store holding the last-synced snapshot of every setting
// ABOUTME: Atomic snapshot replacement on load, synchronous reads and category grouping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::table::SettingsTable;
use super::timeout_millis;
use super::types::{Category, CommittedValue, Setting, SettingRow};
use crate::errors::LoadError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::future::{self, Future};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Immutable view of all settings as of one load
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    settings: Vec<Setting>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Build a snapshot from table rows, preserving their order
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidRow` for a row with an unknown type or empty key,
    /// and `LoadError::DuplicateKey` when a key occurs twice
    pub fn from_rows(rows: Vec<SettingRow>) -> Result<Self, LoadError> {
        let mut settings = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());

        for row in rows {
            let setting = Setting::try_from(row)?;
            if index.contains_key(&setting.key) {
                return Err(LoadError::DuplicateKey { key: setting.key });
            }
            index.insert(setting.key.clone(), settings.len());
            settings.push(setting);
        }

        Ok(Self {
            settings,
            index,
            loaded_at: Some(Utc::now()),
        })
    }

    /// Look up a setting by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Setting> {
        self.index.get(key).and_then(|&i| self.settings.get(i))
    }

    /// All settings in load order
    #[must_use]
    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// Number of settings
    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Whether nothing has been loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// When this snapshot was read from the table
    #[must_use]
    pub const fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Settings of one category in load order
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Setting> + 'a {
        self.settings.iter().filter(move |s| s.category == category)
    }

    /// Category tags in order of first appearance
    #[must_use]
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for setting in &self.settings {
            if !names.contains(&setting.category.as_str()) {
                names.push(&setting.category);
            }
        }
        names
    }

    /// Partition into categories, first-appearance order
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.category_names()
            .into_iter()
            .map(|name| Category {
                name: name.to_owned(),
                settings: self.by_category(name).cloned().collect(),
            })
            .collect()
    }

    /// Key to setting map
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, Setting> {
        self.settings
            .iter()
            .map(|s| (s.key.clone(), s.clone()))
            .collect()
    }

    fn with_committed(&self, key: &str, committed: &CommittedValue) -> Option<Self> {
        let &position = self.index.get(key)?;
        let mut next = self.clone();
        let setting = next.settings.get_mut(position)?;
        setting.value.clone_from(&committed.value);
        setting.updated_at = Some(committed.updated_at);
        Some(next)
    }
}

/// Holds the authoritative last-synced snapshot of all settings
///
/// Readers get an `Arc<Snapshot>`, so a concurrent `load` never exposes a
/// partially replaced set. Reads never suspend.
pub struct SettingsStore {
    table: Arc<dyn SettingsTable>,
    snapshot: RwLock<Arc<Snapshot>>,
    load_timeout: Duration,
}

impl SettingsStore {
    /// Create an empty store over `table`
    #[must_use]
    pub fn new(table: Arc<dyn SettingsTable>, load_timeout: Duration) -> Self {
        Self {
            table,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            load_timeout,
        }
    }

    /// Fetch the full table and replace the snapshot
    ///
    /// # Errors
    ///
    /// Returns a `LoadError` when the read fails, times out or yields invalid rows;
    /// the previous snapshot stays in place
    pub async fn load(&self) -> Result<Arc<Snapshot>, LoadError> {
        self.load_or_cancel(future::pending()).await
    }

    /// Like [`load`](Self::load), abandoned when `cancel` resolves first
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Cancelled` on cancellation, otherwise as `load`
    pub async fn load_or_cancel<C>(&self, cancel: C) -> Result<Arc<Snapshot>, LoadError>
    where
        C: Future<Output = ()> + Send,
    {
        let fetch = tokio::time::timeout(self.load_timeout, self.table.fetch_all());

        let rows = tokio::select! {
            biased;
            () = cancel => {
                info!("Settings load cancelled, keeping previous snapshot");
                return Err(LoadError::Cancelled);
            }
            fetched = fetch => match fetched {
                Ok(result) => result.inspect_err(|e| warn!(error = %e, "Settings load failed"))?,
                Err(_) => {
                    let after_ms = timeout_millis(self.load_timeout);
                    warn!(timeout_ms = after_ms, "Settings load timed out");
                    return Err(LoadError::TimedOut { after_ms });
                }
            },
        };

        let next = Arc::new(Snapshot::from_rows(rows).inspect_err(|e| {
            warn!(error = %e, "Rejected settings table read");
        })?);
        self.warn_on_type_changes(&next);
        self.replace(Arc::clone(&next));

        info!(
            settings = next.len(),
            categories = next.category_names().len(),
            "Loaded site settings"
        );
        Ok(next)
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Setting for `key`, `None` when the key is unknown
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Setting> {
        self.snapshot().get(key).cloned()
    }

    /// Settings of `category` in load order
    #[must_use]
    pub fn get_by_category(&self, category: &str) -> Vec<Setting> {
        self.snapshot().by_category(category).cloned().collect()
    }

    /// All categories with their settings
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.snapshot().categories()
    }

    /// Key to value of the settings flagged `is_public`, for the public site
    #[must_use]
    pub fn public_values(&self) -> BTreeMap<String, String> {
        self.snapshot()
            .settings()
            .iter()
            .filter(|s| s.is_public)
            .map(|s| (s.key.clone(), s.value.clone()))
            .collect()
    }

    /// Move the baseline of `key` to a value that was committed remotely
    ///
    /// Returns `false` when the key is not in the snapshot.
    pub(crate) fn apply_committed(&self, key: &str, committed: &CommittedValue) -> bool {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        match guard.with_committed(key, committed) {
            Some(next) => {
                *guard = Arc::new(next);
                debug!(key, "Baseline updated from commit");
                true
            }
            None => false,
        }
    }

    fn replace(&self, next: Arc<Snapshot>) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn warn_on_type_changes(&self, next: &Snapshot) {
        let previous = self.snapshot();
        for setting in next.settings() {
            if let Some(old) = previous.get(&setting.key) {
                if old.setting_type != setting.setting_type {
                    warn!(
                        key = %setting.key,
                        from = %old.setting_type,
                        to = %setting.setting_type,
                        "Setting type changed between loads"
                    );
                }
            }
        }
    }
}

// ABOUTME: Type definitions for the site-configuration engine
// ABOUTME: Setting data model, persisted row schema, category grouping and batch results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{CommitError, LoadError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Declared type of a setting, fixed for the lifetime of its key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    /// Single-line text
    Text,
    /// Multi-line text
    Textarea,
    /// Decimal number
    Number,
    /// On/off toggle
    Boolean,
    /// Hex color
    Color,
    /// Image URL produced by the asset pipeline
    Image,
}

impl SettingType {
    /// Every supported type, in display order
    pub const ALL: [Self; 6] = [
        Self::Text,
        Self::Textarea,
        Self::Number,
        Self::Boolean,
        Self::Color,
        Self::Image,
    ];

    /// Convert to database representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Color => "color",
            Self::Image => "image",
        }
    }

    /// Parse from database representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "textarea" => Some(Self::Textarea),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "color" => Some(Self::Color),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, named configuration value as held by the settings store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// Globally unique, namespaced key (e.g. `site.title`)
    pub key: String,
    /// Human-readable display name
    pub label: String,
    /// Optional help text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display grouping (e.g. `general`, `appearance`, `contact`)
    pub category: String,
    /// Declared type, selects the value renderer
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    /// Canonical string encoding of the value, empty when unset
    pub value: String,
    /// Visibility flag surfaced to the editor
    pub is_public: bool,
    /// Last committed write, as reported by the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One row of the remote settings table, field for field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingRow {
    /// Primary key
    pub key: String,
    /// Display name
    pub label: String,
    /// Nullable help text
    pub description: Option<String>,
    /// Grouping tag
    pub category: String,
    /// Raw type column
    #[serde(rename = "type")]
    pub setting_type: String,
    /// Canonical value; NULL in storage reads as `None`
    pub value: Option<String>,
    /// Visibility flag
    pub is_public: bool,
    /// Set by the persistence layer on each committed write
    pub updated_at: Option<DateTime<Utc>>,
}

impl SettingRow {
    /// Build a row for seeding a new setting
    #[must_use]
    pub fn new(
        key: &str,
        label: &str,
        category: &str,
        setting_type: SettingType,
        value: &str,
    ) -> Self {
        Self {
            key: key.to_owned(),
            label: label.to_owned(),
            description: None,
            category: category.to_owned(),
            setting_type: setting_type.as_str().to_owned(),
            value: Some(value.to_owned()),
            is_public: false,
            updated_at: None,
        }
    }

    /// Attach help text
    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Mark the setting as publicly visible
    #[must_use]
    pub const fn public(mut self) -> Self {
        self.is_public = true;
        self
    }
}

impl TryFrom<SettingRow> for Setting {
    type Error = LoadError;

    fn try_from(row: SettingRow) -> Result<Self, Self::Error> {
        if row.key.trim().is_empty() {
            return Err(LoadError::InvalidRow {
                key: row.key,
                reason: "empty key".to_owned(),
            });
        }
        let Some(setting_type) = SettingType::parse(&row.setting_type) else {
            return Err(LoadError::InvalidRow {
                reason: format!("unknown setting type '{}'", row.setting_type),
                key: row.key,
            });
        };

        Ok(Self {
            key: row.key,
            label: row.label,
            description: row.description,
            category: row.category,
            setting_type,
            value: row.value.unwrap_or_default(),
            is_public: row.is_public,
            updated_at: row.updated_at,
        })
    }
}

impl From<Setting> for SettingRow {
    fn from(setting: Setting) -> Self {
        Self {
            key: setting.key,
            label: setting.label,
            description: setting.description,
            category: setting.category,
            setting_type: setting.setting_type.as_str().to_owned(),
            value: Some(setting.value),
            is_public: setting.is_public,
            updated_at: setting.updated_at,
        }
    }
}

/// Settings sharing a category tag, in load order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Category tag
    pub name: String,
    /// Settings in this category
    pub settings: Vec<Setting>,
}

/// Per-key edit state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    /// No buffered edit
    Clean,
    /// Buffered value differs from baseline
    Dirty,
}

/// A setting as shown in the editor: baseline plus any pending edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingView {
    /// Baseline setting from the store
    pub setting: Setting,
    /// Buffered value when dirty, otherwise the baseline value
    pub displayed_value: String,
    /// Whether an unsaved edit exists
    pub state: EditState,
}

/// Pending changes: key to canonical new value, ordered by key
pub type Diff = BTreeMap<String, String>;

/// Value written for a key that committed successfully
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommittedValue {
    /// Canonical value now stored remotely
    pub value: String,
    /// Timestamp the table recorded for the write
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a batch commit; each key of the input diff lands in exactly one map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Keys whose write succeeded
    pub committed: BTreeMap<String, CommittedValue>,
    /// Keys whose write failed, with the reason
    pub failed: BTreeMap<String, CommitError>,
}

impl BatchResult {
    /// Keys that saved
    #[must_use]
    pub fn committed_keys(&self) -> BTreeSet<String> {
        self.committed.keys().cloned().collect()
    }

    /// Keys that did not save
    #[must_use]
    pub fn failed_keys(&self) -> BTreeSet<String> {
        self.failed.keys().cloned().collect()
    }

    /// No key was part of the commit
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.failed.is_empty()
    }

    /// Every key saved
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// At least one key was cut off by cancellation
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.failed
            .values()
            .any(|error| matches!(error, CommitError::Cancelled))
    }

    /// Number of keys covered by the result
    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len() + self.failed.len()
    }

    /// Per-key outcomes ordered by key
    pub fn outcomes(&self) -> impl Iterator<Item = (&str, Result<&CommittedValue, &CommitError>)> {
        let mut outcomes: Vec<_> = self
            .committed
            .iter()
            .map(|(key, value)| (key.as_str(), Ok(value)))
            .chain(
                self.failed
                    .iter()
                    .map(|(key, error)| (key.as_str(), Err(error))),
            )
            .collect();
        outcomes.sort_by(|a, b| a.0.cmp(b.0));
        outcomes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_type_round_trips_through_column() {
        for setting_type in SettingType::ALL {
            assert_eq!(SettingType::parse(setting_type.as_str()), Some(setting_type));
        }
        assert_eq!(SettingType::parse("json"), None);
    }

    #[test]
    fn test_row_with_null_value_loads_as_empty() {
        let mut row = SettingRow::new("site.logo", "Logo", "appearance", SettingType::Image, "");
        row.value = None;
        let setting = Setting::try_from(row).unwrap();
        assert_eq!(setting.value, "");
    }

    #[test]
    fn test_row_with_unknown_type_is_rejected() {
        let mut row = SettingRow::new("site.title", "Title", "general", SettingType::Text, "x");
        row.setting_type = "markdown".to_owned();
        let err = Setting::try_from(row).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRow { ref key, .. } if key == "site.title"));
    }

    #[test]
    fn test_setting_serializes_type_field() {
        let setting = Setting::try_from(
            SettingRow::new("site.title", "Title", "general", SettingType::Text, "Clinic").public(),
        )
        .unwrap();
        let json = serde_json::to_value(&setting).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["is_public"], true);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_batch_result_outcomes_are_ordered() {
        let mut result = BatchResult::default();
        result.failed.insert("b".to_owned(), CommitError::Cancelled);
        result.committed.insert(
            "a".to_owned(),
            CommittedValue {
                value: "1".to_owned(),
                updated_at: Utc::now(),
            },
        );
        let keys: Vec<_> = result.outcomes().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(result.len(), 2);
        assert!(!result.is_success());
        assert!(result.was_cancelled());
    }
}

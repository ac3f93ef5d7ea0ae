// ABOUTME: Contract of the remote key/value table backing the settings store
// ABOUTME: Full-table reads and single-key value writes, implemented by the database layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::types::SettingRow;
use crate::errors::TableError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Remote settings table
///
/// The engine never pages or filters server-side and never writes anything
/// but `value` and `updated_at`; schema and seed rows are managed out of band.
#[async_trait]
pub trait SettingsTable: Send + Sync {
    /// Read every row, in the table's insertion order
    async fn fetch_all(&self) -> Result<Vec<SettingRow>, TableError>;

    /// Set `value` for `key` and refresh its `updated_at`
    ///
    /// Must not touch `type`, `category`, `label` or `is_public`. Returns the
    /// timestamp recorded for the write; a missing key is `TableError::NotFound`.
    async fn update_value(&self, key: &str, value: &str) -> Result<DateTime<Utc>, TableError>;
}

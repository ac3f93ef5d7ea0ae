// ABOUTME: In-memory settings table and fixture rows shared by tests and benches
// ABOUTME: Supports per-key write failures, fetch failures, read and write latency, call counting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::TableError;
use crate::settings::table::SettingsTable;
use crate::settings::types::{SettingRow, SettingType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Settings table kept in memory
#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: Mutex<Vec<SettingRow>>,
    write_failures: Mutex<HashMap<String, TableError>>,
    fetch_failure: Mutex<Option<TableError>>,
    write_delay: Mutex<Option<Duration>>,
    fetch_delay: Mutex<Option<Duration>>,
    fetch_calls: AtomicUsize,
    write_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryTable {
    /// Table holding `rows`
    #[must_use]
    pub fn new(rows: Vec<SettingRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    /// Make every write to `key` fail with `error`
    pub fn fail_writes_for(&self, key: &str, error: TableError) {
        lock(&self.write_failures).insert(key.to_owned(), error);
    }

    /// Let writes to `key` succeed again
    pub fn clear_write_failure(&self, key: &str) {
        lock(&self.write_failures).remove(key);
    }

    /// Make `fetch_all` fail (or succeed again with `None`)
    pub fn fail_fetch(&self, error: Option<TableError>) {
        *lock(&self.fetch_failure) = error;
    }

    /// Delay every write by `delay`
    pub fn set_write_delay(&self, delay: Duration) {
        *lock(&self.write_delay) = Some(delay);
    }

    /// Delay every `fetch_all` by `delay`
    pub fn set_fetch_delay(&self, delay: Duration) {
        *lock(&self.fetch_delay) = Some(delay);
    }

    /// Swap the stored rows, as an out-of-band migration would
    pub fn replace_rows(&self, rows: Vec<SettingRow>) {
        *lock(&self.rows) = rows;
    }

    /// Stored value for `key`
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        lock(&self.rows)
            .iter()
            .find(|row| row.key == key)
            .and_then(|row| row.value.clone())
    }

    /// Number of `fetch_all` calls so far
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of `update_value` calls so far
    #[must_use]
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Highest number of writes observed running at once
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn store(&self, key: &str, value: &str) -> Result<DateTime<Utc>, TableError> {
        if let Some(error) = lock(&self.write_failures).get(key) {
            return Err(error.clone());
        }
        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|row| row.key == key)
            .ok_or_else(|| TableError::NotFound {
                key: key.to_owned(),
            })?;
        let now = Utc::now();
        row.value = Some(value.to_owned());
        row.updated_at = Some(now);
        Ok(now)
    }
}

#[async_trait]
impl SettingsTable for MemoryTable {
    async fn fetch_all(&self) -> Result<Vec<SettingRow>, TableError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *lock(&self.fetch_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = lock(&self.fetch_failure).clone() {
            return Err(error);
        }
        Ok(lock(&self.rows).clone())
    }

    async fn update_value(&self, key: &str, value: &str) -> Result<DateTime<Utc>, TableError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = *lock(&self.write_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.store(key, value);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A small clinic site covering every setting type
#[must_use]
pub fn sample_rows() -> Vec<SettingRow> {
    vec![
        SettingRow::new("site.title", "Site title", "general", SettingType::Text, "Clinic").public(),
        SettingRow::new(
            "site.about",
            "About the clinic",
            "general",
            SettingType::Textarea,
            "Family practice since 1998.",
        ),
        SettingRow::new(
            "appearance.primary_color",
            "Primary color",
            "appearance",
            SettingType::Color,
            "#0a7cff",
        )
        .public(),
        SettingRow::new("appearance.logo", "Logo", "appearance", SettingType::Image, "")
            .public(),
        SettingRow::new(
            "booking.slot_minutes",
            "Appointment length (minutes)",
            "booking",
            SettingType::Number,
            "30",
        ),
        SettingRow::new(
            "booking.online_enabled",
            "Online booking",
            "booking",
            SettingType::Boolean,
            "true",
        ),
    ]
}

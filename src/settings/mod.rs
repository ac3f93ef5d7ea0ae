// ABOUTME: Site-configuration engine for the clinic admin dashboard
// ABOUTME: Typed settings, value renderers, snapshot store, change tracking and batch commits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Site Settings
//!
//! Clinic staff edit the public website's configuration (title, colors, logo,
//! contact details, booking rules) through typed settings stored in a remote
//! key/value table. This module owns:
//!
//! - **Typed values**: six setting types, each validated and canonically encoded
//! - **Snapshot reads**: grouped by category, atomically replaced on load
//! - **Change tracking**: one edit buffer, one `diff()`, per-key revert
//! - **Batch commits**: independent per-key writes with partial-failure reporting
//!
//! # Architecture
//!
//! ```text
//! SettingsEditor (editor.rs)
//!        │
//!        ├── SettingsStore (store.rs)
//!        │   └── Arc<Snapshot> replaced on each load
//!        │
//!        ├── ChangeTracker (tracker.rs)
//!        │   ├── ValueRenderer (renderer.rs) per declared type
//!        │   └── AssetPipeline (assets) for image uploads
//!        │
//!        └── BatchPersister (persister.rs)
//!            └── SettingsTable (table.rs)
//!                └── site_settings table (database/settings.rs)
//! ```
//!
//! # Example Usage
//!
//! ```text
//! let mut editor = SettingsEditor::new(table, load_timeout, CommitOptions::default());
//! editor.refresh().await?;
//!
//! editor.edit("site.title", "New Clinic")?;
//! let result = editor.save().await;
//! for (key, outcome) in result.outcomes() { ... }
//! ```

/// Default settings of a clinic site
pub mod catalog;
/// Editing session
pub mod editor;
/// Batch commit of pending edits
pub mod persister;
/// Per-type validation and encoding
pub mod renderer;
/// Snapshot store
pub mod store;
/// Remote table contract
pub mod table;
/// Edit buffer and reconciliation
pub mod tracker;
/// Data model
pub mod types;

pub use editor::SettingsEditor;
pub use persister::{BatchPersister, CommitOptions};
pub use renderer::{SettingValue, ValueRenderer, Widget};
pub use store::{SettingsStore, Snapshot};
pub use table::SettingsTable;
pub use tracker::ChangeTracker;
pub use types::{
    BatchResult, Category, CommittedValue, Diff, EditState, Setting, SettingRow, SettingType,
    SettingView,
};

/// Timeout in whole milliseconds, as reported in timeout errors
pub(crate) fn timeout_millis(timeout: std::time::Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

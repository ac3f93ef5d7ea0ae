// ABOUTME: Main library entry point for the clinic admin site-configuration engine
// ABOUTME: Typed site settings with change tracking, batch commits and image uploads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Clinic Admin
//!
//! Configuration engine behind the clinic website's admin dashboard. Staff
//! edit typed settings (site title, brand colors, logo, contact details,
//! booking rules); edits are validated per type, buffered locally, and
//! committed to the settings table as independent per-key writes.
//!
//! ## Features
//!
//! - **Closed type set**: text, textarea, number, boolean, color and image
//! - **Single diff**: all "unsaved changes" state comes from one buffer
//! - **Partial failure**: every commit reports exactly which keys saved
//! - **Image uploads**: through a pluggable asset pipeline
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clinic_admin::config::SettingsConfig;
//! use clinic_admin::database::Database;
//! use clinic_admin::errors::AppResult;
//! use clinic_admin::settings::SettingsEditor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = SettingsConfig::from_env()?;
//!     let database = Arc::new(Database::new(&config.database_url).await?);
//!
//!     let mut editor = SettingsEditor::new(database, config.load_timeout, config.commit);
//!     editor.refresh().await?;
//!     editor.edit("site.title", "Riverside Family Clinic")?;
//!
//!     let result = editor.save().await;
//!     println!("saved {} setting(s)", result.committed.len());
//!     Ok(())
//! }
//! ```

/// Asset pipeline for image settings
pub mod assets;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// SQLite settings table
pub mod database;

/// Unified error handling
pub mod errors;

/// Logging setup
pub mod logging;

/// Site-configuration engine
pub mod settings;

/// In-memory table and fixtures for tests and benches
#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

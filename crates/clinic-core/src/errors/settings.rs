// ABOUTME: Error taxonomy of the site-configuration engine
// ABOUTME: Validation, load, upload, commit and remote-table errors returned as values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Settings Error Types
//!
//! Every failure of the configuration engine has a bounded recovery path, so
//! each one is a plain value returned from the operation that failed:
//!
//! - `ValidationError` - rejected at edit time, never reaches the network
//! - `LoadError` - full-table read failed, previous snapshot retained
//! - `UploadError` - asset pipeline refused the bytes, nothing buffered
//! - `CommitError` - one key of a batch failed, siblings unaffected
//! - `TableError` - raw failure reported by the remote table
//! - `EditError` - image edit rejected by validation or by the upload
//!
//! Conversions into `AppError` live in the parent module.

use thiserror::Error;

/// Edit rejected by a value renderer before it enters the change buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The key is not present in the loaded snapshot
    #[error("unknown setting '{key}'")]
    UnknownKey {
        /// Key that was edited
        key: String,
    },
    /// Number setting received text that is not a decimal number
    #[error("setting '{key}' expects a number, got '{input}'")]
    NotNumeric {
        /// Key that was edited
        key: String,
        /// Rejected input
        input: String,
    },
    /// Number setting received empty input and has no default
    #[error("setting '{key}' requires a number")]
    MissingNumber {
        /// Key that was edited
        key: String,
    },
    /// Boolean setting received something other than a toggle value
    #[error("setting '{key}' expects true or false, got '{input}'")]
    InvalidBoolean {
        /// Key that was edited
        key: String,
        /// Rejected input
        input: String,
    },
    /// Color setting received a string that is not 3- or 6-digit hex
    #[error("setting '{key}' expects a hex color like #1a2b3c, got '{input}'")]
    InvalidColor {
        /// Key that was edited
        key: String,
        /// Rejected input
        input: String,
    },
    /// A typed value was submitted under a different setting type
    #[error("setting '{key}' is of type {expected}, cannot accept a {provided} value")]
    TypeMismatch {
        /// Key that was edited
        key: String,
        /// Declared type of the setting
        expected: &'static str,
        /// Type of the submitted value
        provided: &'static str,
    },
}

impl ValidationError {
    /// Key the rejected edit targeted
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::UnknownKey { key }
            | Self::NotNumeric { key, .. }
            | Self::MissingNumber { key }
            | Self::InvalidBoolean { key, .. }
            | Self::InvalidColor { key, .. }
            | Self::TypeMismatch { key, .. } => key,
        }
    }
}

/// Failure reported by the remote settings table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Write targeted a key that has no row
    #[error("no setting row for key '{key}'")]
    NotFound {
        /// Missing key
        key: String,
    },
    /// The table could not be reached
    #[error("settings table unavailable: {0}")]
    Unavailable(String),
    /// The table rejected or failed the statement
    #[error("settings table error: {0}")]
    Database(String),
}

/// Full-table load failed; the previous snapshot is still in place
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The remote read itself failed
    #[error("failed to read settings: {0}")]
    Table(#[from] TableError),
    /// A row could not be turned into a setting
    #[error("invalid settings row '{key}': {reason}")]
    InvalidRow {
        /// Key of the offending row
        key: String,
        /// What was wrong with it
        reason: String,
    },
    /// The same key appeared twice in one read
    #[error("duplicate setting key '{key}' in table read")]
    DuplicateKey {
        /// Repeated key
        key: String,
    },
    /// The read did not finish in time
    #[error("settings load timed out after {after_ms}ms")]
    TimedOut {
        /// Configured timeout in milliseconds
        after_ms: u64,
    },
    /// The caller abandoned the load
    #[error("settings load cancelled")]
    Cancelled,
}

/// Asset pipeline refused an upload; no edit is created for the key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Zero-length upload
    #[error("uploaded file is empty")]
    Empty,
    /// Upload exceeds the configured size limit
    #[error("uploaded file is {size} bytes, limit is {max}")]
    TooLarge {
        /// Size of the upload
        size: usize,
        /// Configured limit
        max: usize,
    },
    /// Declared MIME type is not accepted
    #[error("file type '{mime}' is not accepted")]
    UnsupportedType {
        /// Declared MIME type
        mime: String,
    },
    /// File content does not match the declared MIME type
    #[error("file content does not look like {declared}")]
    ContentMismatch {
        /// Declared MIME type
        declared: String,
    },
    /// Storing the asset failed
    #[error("failed to store asset: {0}")]
    Storage(String),
}

/// Failure of a single key inside a batch commit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    /// The remote write for this key failed
    #[error(transparent)]
    Table(#[from] TableError),
    /// The write did not settle in time
    #[error("write timed out after {after_ms}ms")]
    TimedOut {
        /// Configured timeout in milliseconds
        after_ms: u64,
    },
    /// The commit was cancelled before this key settled
    #[error("commit cancelled before the write settled")]
    Cancelled,
}

/// Failure of an edit that goes through the asset pipeline first
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The edit was rejected before any upload
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The asset pipeline refused the file
    #[error(transparent)]
    Upload(#[from] UploadError),
}

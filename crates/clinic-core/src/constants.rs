// ABOUTME: Application-wide constants for the site-configuration engine
// ABOUTME: Environment variable names, commit/load limits and asset upload defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Service identity used in structured logs
pub mod service_names {
    /// Name reported by the logging layer
    pub const CLINIC_ADMIN: &str = "clinic-admin";
}

/// Environment variable names read by the configuration layer
pub mod env_vars {
    /// Database URL of the remote settings table
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Directory the local asset pipeline writes into
    pub const ASSET_DIR: &str = "CLINIC_ASSET_DIR";
    /// Public URL prefix returned for uploaded assets
    pub const ASSET_BASE_URL: &str = "CLINIC_ASSET_BASE_URL";
    /// Maximum accepted upload size in bytes
    pub const ASSET_MAX_BYTES: &str = "CLINIC_ASSET_MAX_BYTES";
    /// Comma-separated list of accepted image MIME types
    pub const ASSET_MIME_TYPES: &str = "CLINIC_ASSET_MIME_TYPES";
    /// Maximum number of per-key writes in flight during a commit
    pub const COMMIT_CONCURRENCY: &str = "CLINIC_COMMIT_CONCURRENCY";
    /// Per-key write timeout in seconds
    pub const WRITE_TIMEOUT_SECS: &str = "CLINIC_WRITE_TIMEOUT_SECS";
    /// Full-table load timeout in seconds
    pub const LOAD_TIMEOUT_SECS: &str = "CLINIC_LOAD_TIMEOUT_SECS";
}

/// Defaults for the settings engine
pub mod settings {
    /// Default database URL when `DATABASE_URL` is unset
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/clinic_settings.db";
    /// Writes issued concurrently by one commit
    pub const DEFAULT_COMMIT_CONCURRENCY: usize = 8;
    /// Upper bound accepted from configuration for commit concurrency
    pub const MAX_COMMIT_CONCURRENCY: usize = 64;
    /// Seconds a single key write may take before it is reported as failed
    pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 15;
    /// Seconds a full-table load may take
    pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 30;
    /// Name of the persisted settings table
    pub const TABLE_NAME: &str = "site_settings";
}

/// Defaults for image uploads
pub mod assets {
    /// Maximum upload size (2 MiB)
    pub const DEFAULT_MAX_BYTES: usize = 2 * 1024 * 1024;
    /// Accepted image MIME types
    pub const DEFAULT_MIME_TYPES: &[&str] = &[
        "image/png",
        "image/jpeg",
        "image/gif",
        "image/webp",
        "image/svg+xml",
    ];
    /// Directory used when `CLINIC_ASSET_DIR` is unset
    pub const DEFAULT_ASSET_DIR: &str = "./data/assets";
    /// URL prefix used when `CLINIC_ASSET_BASE_URL` is unset
    pub const DEFAULT_BASE_URL: &str = "/assets";
}

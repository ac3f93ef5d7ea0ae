// ABOUTME: Environment configuration for the settings engine and its collaborators
// ABOUTME: Parses database URL, asset upload limits, commit concurrency and timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use crate::assets::UploadConstraints;
use crate::constants::{assets, env_vars, settings};
use crate::errors::{AppError, AppResult};
use crate::settings::CommitOptions;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Runtime configuration of the settings engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsConfig {
    /// Database URL of the settings table
    pub database_url: String,
    /// Directory the local asset pipeline writes into
    pub asset_dir: PathBuf,
    /// URL prefix of stored assets
    pub asset_base_url: String,
    /// Limits applied to image uploads
    pub upload: UploadConstraints,
    /// Limits applied to batch commits
    pub commit: CommitOptions,
    /// Upper bound on a full-table load
    pub load_timeout: Duration,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            database_url: settings::DEFAULT_DATABASE_URL.to_owned(),
            asset_dir: PathBuf::from(assets::DEFAULT_ASSET_DIR),
            asset_base_url: assets::DEFAULT_BASE_URL.to_owned(),
            upload: UploadConstraints::default(),
            commit: CommitOptions::default(),
            load_timeout: Duration::from_secs(settings::DEFAULT_LOAD_TIMEOUT_SECS),
        }
    }
}

impl SettingsConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a variable is set to an invalid value
    pub fn from_env() -> AppResult<Self> {
        let max_in_flight: usize =
            parse_env(env_vars::COMMIT_CONCURRENCY, settings::DEFAULT_COMMIT_CONCURRENCY)?;
        if !(1..=settings::MAX_COMMIT_CONCURRENCY).contains(&max_in_flight) {
            return Err(AppError::config(format!(
                "{} must be between 1 and {}, got {max_in_flight}",
                env_vars::COMMIT_CONCURRENCY,
                settings::MAX_COMMIT_CONCURRENCY
            )));
        }

        let write_timeout = positive_secs(env_vars::WRITE_TIMEOUT_SECS, settings::DEFAULT_WRITE_TIMEOUT_SECS)?;
        let load_timeout = positive_secs(env_vars::LOAD_TIMEOUT_SECS, settings::DEFAULT_LOAD_TIMEOUT_SECS)?;

        let max_bytes: usize = parse_env(env_vars::ASSET_MAX_BYTES, assets::DEFAULT_MAX_BYTES)?;
        if max_bytes == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_vars::ASSET_MAX_BYTES
            )));
        }

        let accepted_mime_types = match env::var(env_vars::ASSET_MIME_TYPES) {
            Ok(raw) => parse_mime_list(&raw),
            Err(_) => UploadConstraints::default().accepted_mime_types,
        };
        if accepted_mime_types.is_empty() {
            return Err(AppError::config(format!(
                "{} must list at least one MIME type",
                env_vars::ASSET_MIME_TYPES
            )));
        }

        let config = Self {
            database_url: env_var_or(env_vars::DATABASE_URL, settings::DEFAULT_DATABASE_URL),
            asset_dir: PathBuf::from(env_var_or(env_vars::ASSET_DIR, assets::DEFAULT_ASSET_DIR)),
            asset_base_url: env_var_or(env_vars::ASSET_BASE_URL, assets::DEFAULT_BASE_URL),
            upload: UploadConstraints {
                max_bytes,
                accepted_mime_types,
            },
            commit: CommitOptions {
                max_in_flight,
                write_timeout,
            },
            load_timeout,
        };

        info!(
            database_url = %config.database_url,
            asset_dir = %config.asset_dir.display(),
            max_in_flight = config.commit.max_in_flight,
            "Loaded settings configuration"
        );
        Ok(config)
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

fn positive_secs(key: &str, default: u64) -> AppResult<Duration> {
    let secs: u64 = parse_env(key, default)?;
    if secs == 0 {
        return Err(AppError::config(format!("{key} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse comma-separated MIME types
fn parse_mime_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mime_list() {
        assert_eq!(
            parse_mime_list(" image/PNG, ,image/webp "),
            vec!["image/png".to_owned(), "image/webp".to_owned()]
        );
        assert!(parse_mime_list(" , ").is_empty());
    }

    #[test]
    fn test_defaults_match_constants() {
        let config = SettingsConfig::default();
        assert_eq!(config.commit.max_in_flight, settings::DEFAULT_COMMIT_CONCURRENCY);
        assert_eq!(config.upload.max_bytes, assets::DEFAULT_MAX_BYTES);
        assert_eq!(config.asset_base_url, "/assets");
    }
}

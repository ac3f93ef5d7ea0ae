// ABOUTME: Tests for environment-driven settings configuration
// ABOUTME: Runs serially because each case mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use clinic_admin::{
    config::SettingsConfig,
    constants::env_vars,
    errors::ErrorCode,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const ALL_VARS: [&str; 8] = [
    env_vars::DATABASE_URL,
    env_vars::ASSET_DIR,
    env_vars::ASSET_BASE_URL,
    env_vars::ASSET_MAX_BYTES,
    env_vars::ASSET_MIME_TYPES,
    env_vars::COMMIT_CONCURRENCY,
    env_vars::WRITE_TIMEOUT_SECS,
    env_vars::LOAD_TIMEOUT_SECS,
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_when_unset() {
    clear_env();

    let config = SettingsConfig::from_env().unwrap();

    assert_eq!(config, SettingsConfig::default());
}

#[test]
#[serial]
fn test_reads_every_variable() {
    clear_env();
    env::set_var(env_vars::DATABASE_URL, "sqlite::memory:");
    env::set_var(env_vars::ASSET_DIR, "/var/lib/clinic/assets");
    env::set_var(env_vars::ASSET_BASE_URL, "https://cdn.clinic.example");
    env::set_var(env_vars::ASSET_MAX_BYTES, "1048576");
    env::set_var(env_vars::ASSET_MIME_TYPES, "image/png, image/WEBP");
    env::set_var(env_vars::COMMIT_CONCURRENCY, "4");
    env::set_var(env_vars::WRITE_TIMEOUT_SECS, "5");
    env::set_var(env_vars::LOAD_TIMEOUT_SECS, "12");

    let config = SettingsConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.database_url, "sqlite::memory:");
    assert_eq!(config.asset_dir, PathBuf::from("/var/lib/clinic/assets"));
    assert_eq!(config.asset_base_url, "https://cdn.clinic.example");
    assert_eq!(config.upload.max_bytes, 1_048_576);
    assert_eq!(
        config.upload.accepted_mime_types,
        vec!["image/png".to_owned(), "image/webp".to_owned()]
    );
    assert_eq!(config.commit.max_in_flight, 4);
    assert_eq!(config.commit.write_timeout, Duration::from_secs(5));
    assert_eq!(config.load_timeout, Duration::from_secs(12));
}

#[test]
#[serial]
fn test_invalid_values_are_config_errors() {
    for (var, value) in [
        (env_vars::COMMIT_CONCURRENCY, "many"),
        (env_vars::COMMIT_CONCURRENCY, "0"),
        (env_vars::COMMIT_CONCURRENCY, "1000"),
        (env_vars::WRITE_TIMEOUT_SECS, "0"),
        (env_vars::LOAD_TIMEOUT_SECS, "-3"),
        (env_vars::ASSET_MAX_BYTES, "0"),
        (env_vars::ASSET_MIME_TYPES, " , "),
    ] {
        clear_env();
        env::set_var(var, value);

        let err = SettingsConfig::from_env().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid, "{var}={value}");
    }
    clear_env();
}

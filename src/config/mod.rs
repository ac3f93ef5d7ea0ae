// ABOUTME: Configuration management for the clinic admin settings engine
// ABOUTME: Environment-driven database, asset upload and commit settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: database URL, asset pipeline and commit limits from environment variables

/// Environment configuration
pub mod environment;

pub use environment::SettingsConfig;

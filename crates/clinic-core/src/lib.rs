// ABOUTME: Core types and constants for the clinic admin site-configuration engine
// ABOUTME: Foundation crate with error handling and application-wide defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Clinic Core
//!
//! Foundation crate providing shared types and constants for the clinic admin
//! dashboard's site-configuration engine. It is designed to change infrequently
//! so the engine crate and its binaries compile incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the
//!   settings error taxonomy (validation, load, upload, commit, table)
//! - **constants**: Defaults and environment variable names

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

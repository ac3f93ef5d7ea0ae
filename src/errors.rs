// ABOUTME: Unified error handling re-exported from the clinic-core foundation crate
// ABOUTME: AppError, ErrorCode, AppResult and the settings error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use clinic_core::errors::*;

// ABOUTME: Application constants re-exported from the clinic-core foundation crate
// ABOUTME: Environment variable names, engine limits and asset upload defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use clinic_core::constants::*;

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports command modules for clinic-settings
// ABOUTME: Provides access to the site settings commands

pub mod settings;

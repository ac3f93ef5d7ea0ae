// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Output formatting helpers for clinic-settings
// ABOUTME: Provides consistent display functions for settings and commit results

use clinic_admin::settings::{BatchResult, EditState, Setting, SettingView};

/// Display one category as an aligned table
pub fn display_category(name: &str, views: &[SettingView]) {
    println!("\n[{name}]");
    let width = views
        .iter()
        .map(|view| view.setting.key.len())
        .max()
        .unwrap_or(0);

    for view in views {
        let marker = match view.state {
            EditState::Dirty => "*",
            EditState::Clean => " ",
        };
        println!(
            "{marker} {:<width$}  {:<8}  {}",
            view.setting.key,
            view.setting.setting_type.as_str(),
            shown(&view.displayed_value),
        );
    }
}

/// Display every field of a setting
pub fn display_setting(setting: &Setting) {
    println!("Key:         {}", setting.key);
    println!("Label:       {}", setting.label);
    if let Some(description) = &setting.description {
        println!("Description: {description}");
    }
    println!("Category:    {}", setting.category);
    println!("Type:        {}", setting.setting_type);
    println!("Value:       {}", shown(&setting.value));
    println!("Public:      {}", if setting.is_public { "yes" } else { "no" });
    if let Some(updated_at) = setting.updated_at {
        println!("Updated:     {}", updated_at.format("%Y-%m-%d %H:%M UTC"));
    }
}

/// Display the per-key outcome of a commit
pub fn display_batch_result(result: &BatchResult) {
    for (key, outcome) in result.outcomes() {
        match outcome {
            Ok(committed) => println!("saved   {key} = {}", shown(&committed.value)),
            Err(error) => println!("FAILED  {key}: {error}"),
        }
    }
    println!(
        "{} saved, {} failed",
        result.committed.len(),
        result.failed.len()
    );
}

fn shown(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

// ABOUTME: Site settings commands for clinic-settings
// ABOUTME: Handles seed, list, get, set, upload-image and public operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use clinic_admin::{
    assets::LocalAssetPipeline,
    config::SettingsConfig,
    database::Database,
    errors::{AppError, AppResult, ErrorCode},
    settings::{catalog, BatchResult, SettingsEditor},
};
use std::path::Path;
use tracing::{info, warn};

use crate::helpers::display::{display_batch_result, display_category, display_setting};

type Result<T> = AppResult<T>;

/// Insert the default settings that are not in the table yet
pub async fn seed(database: &Database) -> Result<()> {
    let rows = catalog::default_rows();
    let inserted = database.seed_settings(&rows).await?;
    println!("Seeded {inserted} of {} default settings", rows.len());
    Ok(())
}

/// Print settings, optionally a single category
pub async fn list(editor: &mut SettingsEditor, category: Option<&str>, json: bool) -> Result<()> {
    editor.refresh().await?;

    match (category, json) {
        (Some(name), true) => {
            let settings = editor.store().get_by_category(name);
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        (None, true) => {
            println!("{}", serde_json::to_string_pretty(&*editor.snapshot())?);
        }
        (Some(name), false) => {
            let views = editor.view(name);
            if views.is_empty() {
                return Err(AppError::not_found(format!("Category '{name}'")));
            }
            display_category(name, &views);
        }
        (None, false) => {
            for (name, views) in editor.view_all() {
                display_category(&name, &views);
            }
        }
    }
    Ok(())
}

/// Print one setting
pub async fn get(editor: &mut SettingsEditor, key: &str) -> Result<()> {
    editor.refresh().await?;
    let setting = editor
        .store()
        .get(key)
        .ok_or_else(|| AppError::not_found(format!("Setting '{key}'")))?;
    display_setting(&setting);
    Ok(())
}

/// Validate every assignment, then commit them together
pub async fn set(editor: &mut SettingsEditor, assignments: &[String]) -> Result<()> {
    editor.refresh().await?;

    for assignment in assignments {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            AppError::invalid_input(format!("Expected key=value, got '{assignment}'"))
        })?;
        editor.edit(key.trim(), value)?;
    }

    if !editor.tracker().has_changes() {
        println!("Nothing to save, values already match");
        return Ok(());
    }

    let result = editor.save().await;
    display_batch_result(&result);
    ensure_saved(&result)
}

/// Upload `file` through the local asset pipeline and save its URL under `key`
pub async fn upload_image(
    editor: &mut SettingsEditor,
    config: &SettingsConfig,
    key: &str,
    file: &Path,
    mime: Option<&str>,
) -> Result<()> {
    let mime = match mime {
        Some(mime) => mime.to_owned(),
        None => guess_mime(file)
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Cannot tell the image type of {}, pass --mime",
                    file.display()
                ))
            })?
            .to_owned(),
    };
    let bytes = tokio::fs::read(file).await?;
    info!(file = %file.display(), size = bytes.len(), mime = %mime, "Uploading image");

    editor.refresh().await?;
    let pipeline = LocalAssetPipeline::new(&config.asset_dir, config.asset_base_url.as_str());
    editor
        .upload_image(key, &bytes, &mime, &pipeline, &config.upload)
        .await?;

    let result = editor.save().await;
    display_batch_result(&result);
    ensure_saved(&result)
}

/// Print the public key/value map as JSON
pub async fn public(editor: &mut SettingsEditor) -> Result<()> {
    editor.refresh().await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&editor.store().public_values())?
    );
    Ok(())
}

fn ensure_saved(result: &BatchResult) -> Result<()> {
    if result.is_success() {
        return Ok(());
    }
    warn!(failed = result.failed.len(), "Some settings were not saved");
    Err(AppError::new(
        ErrorCode::ExternalServiceError,
        format!(
            "{} of {} setting(s) failed to save",
            result.failed.len(),
            result.len()
        ),
    ))
}

fn guess_mime(file: &Path) -> Option<&'static str> {
    let extension = file.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

// ABOUTME: clinic-settings - command-line tool for the clinic website's site settings
// ABOUTME: Seeds the settings table, lists and edits settings, and uploads images
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Create the table and insert the default clinic settings
//! clinic-settings seed
//!
//! # Show every setting, or one category as JSON
//! clinic-settings list
//! clinic-settings list --category appearance --json
//!
//! # Change several settings in one commit
//! clinic-settings set site.title="Riverside Clinic" appearance.primary_color=#1a2b3c
//!
//! # Upload a new logo
//! clinic-settings upload-image appearance.logo ./logo.png
//!
//! # Values the public site renders
//! clinic-settings public
//! ```

mod commands;
mod helpers;

use clap::{Parser, Subcommand};
use clinic_admin::{
    config::SettingsConfig,
    database::Database,
    errors::{AppError, AppResult},
    logging::LoggingConfig,
    settings::{catalog, SettingsEditor},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "clinic-settings",
    about = "Clinic website settings CLI",
    long_about = "Command-line tool for viewing and editing the clinic website's site settings."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create the settings table and insert missing default settings
    Seed,

    /// List settings grouped by category
    List {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one setting
    Get {
        /// Setting key (e.g. `site.title`)
        key: String,
    },

    /// Set one or more settings in a single commit
    Set {
        /// Assignments of the form key=value
        #[arg(required = true)]
        assignments: Vec<String>,
    },

    /// Upload an image and store its URL in an image setting
    UploadImage {
        /// Image setting key (e.g. `appearance.logo`)
        key: String,

        /// Image file to upload
        file: PathBuf,

        /// MIME type (guessed from the file extension if omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Print the public settings as JSON
    Public,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging
        .init()
        .map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))?;

    // Load configuration
    let mut config = SettingsConfig::from_env()?;
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    info!("Connecting to database: {}", config.database_url);
    let database = Arc::new(Database::new(&config.database_url).await?);

    let mut editor = SettingsEditor::new(database.clone(), config.load_timeout, config.commit)
        .with_defaults(catalog::number_defaults());

    match cli.command {
        Command::Seed => commands::settings::seed(&database).await?,
        Command::List { category, json } => {
            commands::settings::list(&mut editor, category.as_deref(), json).await?;
        }
        Command::Get { key } => commands::settings::get(&mut editor, &key).await?,
        Command::Set { assignments } => {
            commands::settings::set(&mut editor, &assignments).await?;
        }
        Command::UploadImage { key, file, mime } => {
            commands::settings::upload_image(&mut editor, &config, &key, &file, mime.as_deref())
                .await?;
        }
        Command::Public => commands::settings::public(&mut editor).await?,
    }

    Ok(())
}

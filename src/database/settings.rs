// ABOUTME: Site settings table operations backing the settings engine
// ABOUTME: Schema, seed step, full-table read and single-key value writes in SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Database;
use crate::errors::{AppError, AppResult, TableError};
use crate::settings::table::SettingsTable;
use crate::settings::types::SettingRow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, info};

impl Database {
    /// Create the `site_settings` table
    pub(super) async fn migrate_site_settings(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS site_settings (
                key TEXT PRIMARY KEY,
                label TEXT NOT NULL,
                description TEXT,
                category TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('text', 'textarea', 'number', 'boolean', 'color', 'image')),
                value TEXT,
                is_public BOOLEAN NOT NULL DEFAULT false,
                updated_at TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create site_settings table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_site_settings_category ON site_settings(category)")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to create site_settings index: {e}"))
            })?;

        Ok(())
    }

    /// Insert the rows whose key is missing, leaving existing rows untouched
    ///
    /// Returns how many rows were inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if a row is rejected (unknown type, for instance); no
    /// row of the batch is inserted then
    pub async fn seed_settings(&self, rows: &[SettingRow]) -> AppResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin seed transaction: {e}")))?;

        let mut inserted = 0;
        for row in rows {
            let result = sqlx::query(
                r"
                INSERT INTO site_settings (key, label, description, category, type, value, is_public, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(key) DO NOTHING
                ",
            )
            .bind(&row.key)
            .bind(&row.label)
            .bind(&row.description)
            .bind(&row.category)
            .bind(&row.setting_type)
            .bind(&row.value)
            .bind(row.is_public)
            .bind(row.updated_at.map(|at| at.to_rfc3339()))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to seed setting '{}': {e}", row.key)))?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit seed transaction: {e}")))?;

        info!(inserted, total = rows.len(), "Seeded site settings");
        Ok(inserted)
    }
}

#[async_trait]
impl SettingsTable for Database {
    async fn fetch_all(&self) -> Result<Vec<SettingRow>, TableError> {
        let rows = sqlx::query(
            r"
            SELECT key, label, description, category, type, value, is_public, updated_at
            FROM site_settings
            ORDER BY rowid
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(table_error)?;

        rows.iter().map(row_to_setting).collect()
    }

    async fn update_value(&self, key: &str, value: &str) -> Result<DateTime<Utc>, TableError> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE site_settings
            SET value = ?1, updated_at = ?2
            WHERE key = ?3
            ",
        )
        .bind(value)
        .bind(now.to_rfc3339())
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(table_error)?;

        if result.rows_affected() == 0 {
            return Err(TableError::NotFound {
                key: key.to_owned(),
            });
        }

        debug!(key, "Updated site setting");
        Ok(now)
    }
}

fn row_to_setting(row: &SqliteRow) -> Result<SettingRow, TableError> {
    let updated_at: Option<String> = row.try_get("updated_at").map_err(table_error)?;
    let updated_at = updated_at.and_then(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|at| at.with_timezone(&Utc))
    });

    Ok(SettingRow {
        key: row.try_get("key").map_err(table_error)?,
        label: row.try_get("label").map_err(table_error)?,
        description: row.try_get("description").map_err(table_error)?,
        category: row.try_get("category").map_err(table_error)?,
        setting_type: row.try_get("type").map_err(table_error)?,
        value: row.try_get("value").map_err(table_error)?,
        is_public: row.try_get("is_public").map_err(table_error)?,
        updated_at,
    })
}

fn table_error(error: sqlx::Error) -> TableError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            TableError::Unavailable(error.to_string())
        }
        other => TableError::Database(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::types::SettingType;
    use crate::test_utils::sample_rows;

    async fn database() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_seed_then_fetch_preserves_order() {
        let db = database().await;
        assert_eq!(db.seed_settings(&sample_rows()).await.unwrap(), 6);

        let rows = db.fetch_all().await.unwrap();
        let keys: Vec<_> = rows.iter().map(|row| row.key.as_str()).collect();
        let expected: Vec<_> = sample_rows().into_iter().map(|row| row.key).collect();
        assert_eq!(keys, expected);
        assert!(rows[0].is_public);
        assert_eq!(rows[0].setting_type, "text");
    }

    #[tokio::test]
    async fn test_seed_does_not_overwrite_existing_rows() {
        let db = database().await;
        db.seed_settings(&sample_rows()).await.unwrap();
        db.update_value("site.title", "Edited").await.unwrap();

        assert_eq!(db.seed_settings(&sample_rows()).await.unwrap(), 0);
        let rows = db.fetch_all().await.unwrap();
        assert_eq!(rows[0].value.as_deref(), Some("Edited"));
    }

    #[tokio::test]
    async fn test_seed_rejects_unknown_type() {
        let db = database().await;
        let mut row = SettingRow::new("site.title", "Title", "general", SettingType::Text, "x");
        row.setting_type = "markdown".to_owned();

        assert!(db.seed_settings(&[row]).await.is_err());
        assert!(db.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_value_touches_value_and_timestamp_only() {
        let db = database().await;
        db.seed_settings(&sample_rows()).await.unwrap();

        let written_at = db.update_value("appearance.primary_color", "#112233").await.unwrap();

        let rows = db.fetch_all().await.unwrap();
        let row = rows
            .iter()
            .find(|row| row.key == "appearance.primary_color")
            .unwrap();
        assert_eq!(row.value.as_deref(), Some("#112233"));
        assert_eq!(row.setting_type, "color");
        assert_eq!(row.category, "appearance");
        assert_eq!(
            row.updated_at.map(|at| at.timestamp_millis()),
            Some(written_at.timestamp_millis())
        );
    }

    #[tokio::test]
    async fn test_update_unknown_key_is_not_found() {
        let db = database().await;
        let err = db.update_value("site.missing", "x").await.unwrap_err();
        assert_eq!(
            err,
            TableError::NotFound {
                key: "site.missing".to_owned()
            }
        );
    }
}

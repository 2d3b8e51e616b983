//! Key/value rows in `settings`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `settings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettingRow {
    pub id: Uuid,
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Returns the value stored under `key`. A missing row, a NULL value and an
/// empty string all come back as `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_setting_value(pool: &PgPool, key: &str) -> Result<Option<String>, DbError> {
    let value = sqlx::query_scalar::<_, Option<String>>("SELECT value FROM settings WHERE key = $1")
        .bind(key)
        .fetch_optional(pool)
        .await?
        .flatten()
        .filter(|v| !v.trim().is_empty());

    Ok(value)
}

/// Returns all settings ordered by key.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_settings(pool: &PgPool) -> Result<Vec<SettingRow>, DbError> {
    let rows = sqlx::query_as::<_, SettingRow>(
        "SELECT id, key, value, description, updated_at FROM settings ORDER BY key",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts or replaces the value for `key`. A `None` description keeps the
/// existing one.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_setting(
    pool: &PgPool,
    key: &str,
    value: Option<&str>,
    description: Option<&str>,
) -> Result<SettingRow, DbError> {
    let row = sqlx::query_as::<_, SettingRow>(
        "INSERT INTO settings (id, key, value, description) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (key) DO UPDATE \
         SET value = EXCLUDED.value, \
             description = COALESCE(EXCLUDED.description, settings.description), \
             updated_at = NOW() \
         RETURNING id, key, value, description, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(key)
    .bind(value)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

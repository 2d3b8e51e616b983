//! Append-only audit log in `system_logs`.

use chrono::{DateTime, Utc};
use socwatch_core::LogKind;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `system_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SystemLogRow {
    pub id: Uuid,
    pub kind: String,
    pub module: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub duration_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSystemLog<'a> {
    pub kind: LogKind,
    pub module: &'a str,
    pub message: &'a str,
    pub details: Option<serde_json::Value>,
    pub duration_ms: Option<i64>,
}

/// Appends one log entry.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_system_log(pool: &PgPool, entry: &NewSystemLog<'_>) -> Result<Uuid, DbError> {
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO system_logs (id, kind, module, message, details, duration_ms) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(entry.kind.as_str())
    .bind(entry.module)
    .bind(entry.message)
    .bind(entry.details.as_ref())
    .bind(entry.duration_ms)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Returns the most recent `limit` entries, newest first, optionally
/// filtered by kind.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_system_logs(
    pool: &PgPool,
    kind: Option<LogKind>,
    limit: i64,
) -> Result<Vec<SystemLogRow>, DbError> {
    let rows = sqlx::query_as::<_, SystemLogRow>(
        "SELECT id, kind, module, message, details, duration_ms, created_at \
         FROM system_logs \
         WHERE ($1::text IS NULL OR kind = $1) \
         ORDER BY created_at DESC, id \
         LIMIT $2",
    )
    .bind(kind.map(LogKind::as_str))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

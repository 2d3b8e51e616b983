//! Database operations for the `monitored_profiles` table.

use chrono::{DateTime, Utc};
use socwatch_core::ProfileStatus;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{conflict_or, DbError};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `monitored_profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub username: String,
    pub platform: String,
    pub active: bool,
    pub collection_interval_minutes: i32,
    pub last_collected_at: Option<DateTime<Utc>>,
    pub total_collections: i32,
    pub status: String,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a profile. `username` must already be
/// normalized (no leading `@`).
#[derive(Debug, Clone)]
pub struct NewProfile<'a> {
    pub username: &'a str,
    pub platform: &'a str,
    pub collection_interval_minutes: i32,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub active: Option<bool>,
    pub platform: Option<String>,
    pub collection_interval_minutes: Option<i32>,
}

const PROFILE_COLUMNS: &str = "id, username, platform, active, collection_interval_minutes, \
     last_collected_at, total_collections, status, last_error, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every profile, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_profiles(pool: &PgPool) -> Result<Vec<ProfileRow>, DbError> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM monitored_profiles ORDER BY created_at DESC, username"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns active profiles in creation order, the order a batch run visits them.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_profiles(pool: &PgPool) -> Result<Vec<ProfileRow>, DbError> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM monitored_profiles \
         WHERE active = true \
         ORDER BY created_at, username"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetches a single profile by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<ProfileRow, DbError> {
    sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM monitored_profiles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Returns the active profile with `username`, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_active_profile_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<ProfileRow>, DbError> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM monitored_profiles \
         WHERE username = $1 AND active = true"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a new profile in `pending` status.
///
/// # Errors
///
/// Returns [`DbError::Conflict`] if the username is already monitored, or
/// [`DbError::Sqlx`] on any other failure.
pub async fn create_profile(pool: &PgPool, new: &NewProfile<'_>) -> Result<ProfileRow, DbError> {
    sqlx::query_as::<_, ProfileRow>(&format!(
        "INSERT INTO monitored_profiles (id, username, platform, collection_interval_minutes) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(new.username)
    .bind(new.platform)
    .bind(new.collection_interval_minutes)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_or(e, &format!("profile @{}", new.username)))
}

/// Inserts an active profile with default settings unless the username
/// already exists (active or not). Returns `None` when nothing was inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_profile_if_absent(
    pool: &PgPool,
    username: &str,
    platform: &str,
) -> Result<Option<ProfileRow>, DbError> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "INSERT INTO monitored_profiles (id, username, platform, active) \
         VALUES ($1, $2, $3, true) \
         ON CONFLICT (username) DO NOTHING \
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(platform)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Applies a partial update and returns the updated row.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    update: &ProfileUpdate,
) -> Result<ProfileRow, DbError> {
    sqlx::query_as::<_, ProfileRow>(&format!(
        "UPDATE monitored_profiles \
         SET active = COALESCE($2, active), \
             platform = COALESCE($3, platform), \
             collection_interval_minutes = COALESCE($4, collection_interval_minutes), \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(id)
    .bind(update.active)
    .bind(update.platform.as_deref())
    .bind(update.collection_interval_minutes)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Deletes a profile. Its collections are kept.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn delete_profile(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM monitored_profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Sets `status` without touching any other run bookkeeping.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn set_profile_status(
    pool: &PgPool,
    id: Uuid,
    status: ProfileStatus,
) -> Result<(), DbError> {
    sqlx::query("UPDATE monitored_profiles SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Records a successful run: `success` status, `last_collected_at`,
/// counter increment, cleared error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_profile_success(
    pool: &PgPool,
    id: Uuid,
    collected_at: DateTime<Utc>,
) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE monitored_profiles \
         SET status = 'success', last_collected_at = $1, \
             total_collections = total_collections + 1, last_error = NULL, \
             updated_at = NOW() \
         WHERE id = $2",
    )
    .bind(collected_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Records a failed run. `last_collected_at` and the counter are left alone.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_profile_error(pool: &PgPool, id: Uuid, message: &str) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE monitored_profiles \
         SET status = 'error', last_error = $1, updated_at = NOW() \
         WHERE id = $2",
    )
    .bind(message)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

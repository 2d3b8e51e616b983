//! Database operations for the `collections` table.
//!
//! There is no uniqueness constraint on `(profile_username, post_id)`; the
//! collector's upsert pairs [`find_collection_id`] with [`insert_collection`]
//! or [`update_collection`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use socwatch_core::NormalizedRecord;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `collections` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CollectionRow {
    pub id: Uuid,
    pub profile_username: String,
    pub collected_at: DateTime<Utc>,
    pub profile_name: Option<String>,
    pub profile_handle: Option<String>,
    pub profile_bio: Option<String>,
    pub profile_followers: Option<i64>,
    pub profile_following: Option<i64>,
    pub profile_posts_total: Option<i64>,
    pub profile_private: bool,
    pub profile_external_url: Option<String>,
    pub profile_category: Option<String>,
    pub profile_picture_url: Option<String>,
    pub post_id: Option<String>,
    pub post_link: Option<String>,
    pub post_caption: Option<String>,
    pub post_type: Option<String>,
    pub post_media_count: Option<i32>,
    pub post_media_info: Option<serde_json::Value>,
    pub post_timestamp: Option<DateTime<Utc>>,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub saves: i64,
    pub video_views: i64,
    pub video_duration_secs: Option<f64>,
    pub hashtags: Vec<String>,
    pub hashtag_count: i32,
    pub location_name: Option<String>,
    pub engagement_rate: Decimal,
    pub created_at: DateTime<Utc>,
}

const COLLECTION_COLUMNS: &str = "id, profile_username, collected_at, \
     profile_name, profile_handle, profile_bio, profile_followers, profile_following, \
     profile_posts_total, profile_private, profile_external_url, profile_category, \
     profile_picture_url, post_id, post_link, post_caption, post_type, post_media_count, \
     post_media_info, post_timestamp, likes, comments, shares, saves, video_views, \
     video_duration_secs, hashtags, hashtag_count, location_name, engagement_rate, created_at";

/// Binds every record-derived column in the order `$2..$30`, matching the
/// column lists in [`insert_collection`] and [`update_collection`].
fn bind_record<'q>(
    query: sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments>,
    record: &'q NormalizedRecord,
) -> sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments> {
    let profile = &record.profile;
    let post = record.post.as_ref();

    query
        .bind(record.profile_username.as_str())
        .bind(record.collected_at)
        .bind(profile.name.as_deref())
        .bind(profile.handle.as_str())
        .bind(profile.bio.as_deref())
        .bind(profile.followers)
        .bind(profile.following)
        .bind(profile.posts_total)
        .bind(profile.is_private)
        .bind(profile.external_url.as_deref())
        .bind(profile.category.as_deref())
        .bind(profile.picture_url.as_deref())
        .bind(post.and_then(|p| p.post_id.as_deref()))
        .bind(post.and_then(|p| p.link.as_deref()))
        .bind(post.and_then(|p| p.caption.as_deref()))
        .bind(post.map(|p| p.post_type.as_str()))
        .bind(post.map(|p| p.media_count))
        .bind(post.and_then(|p| p.media_info.as_ref()))
        .bind(post.and_then(|p| p.timestamp))
        .bind(post.map_or(0, |p| p.likes))
        .bind(post.map_or(0, |p| p.comments))
        .bind(post.map_or(0, |p| p.shares))
        .bind(post.map_or(0, |p| p.saves))
        .bind(post.map_or(0, |p| p.video_views))
        .bind(post.and_then(|p| p.video_duration_secs))
        .bind(post.map(|p| p.hashtags.clone()).unwrap_or_default())
        .bind(post.map_or(0, socwatch_core::NormalizedPost::hashtag_count))
        .bind(post.and_then(|p| p.location_name.as_deref()))
        .bind(record.engagement_rate())
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the id of an existing collection for `(profile_username, post_id)`.
///
/// If duplicates slipped in through concurrent runs, the oldest row wins.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_collection_id(
    pool: &PgPool,
    profile_username: &str,
    post_id: &str,
) -> Result<Option<Uuid>, DbError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM collections \
         WHERE profile_username = $1 AND post_id = $2 \
         ORDER BY created_at \
         LIMIT 1",
    )
    .bind(profile_username)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Inserts a new collection row and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_collection(pool: &PgPool, record: &NormalizedRecord) -> Result<Uuid, DbError> {
    let id = Uuid::new_v4();

    let query = sqlx::query(
        "INSERT INTO collections (\
             id, profile_username, collected_at, \
             profile_name, profile_handle, profile_bio, profile_followers, profile_following, \
             profile_posts_total, profile_private, profile_external_url, profile_category, \
             profile_picture_url, post_id, post_link, post_caption, post_type, \
             post_media_count, post_media_info, post_timestamp, likes, comments, shares, \
             saves, video_views, video_duration_secs, hashtags, hashtag_count, \
             location_name, engagement_rate) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                 $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30)",
    )
    .bind(id);

    bind_record(query, record).execute(pool).await?;

    Ok(id)
}

/// Overwrites every record-derived column of an existing row. `id` and
/// `created_at` are preserved.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the row vanished, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn update_collection(
    pool: &PgPool,
    id: Uuid,
    record: &NormalizedRecord,
) -> Result<(), DbError> {
    let query = sqlx::query(
        "UPDATE collections SET \
             profile_username = $2, collected_at = $3, \
             profile_name = $4, profile_handle = $5, profile_bio = $6, \
             profile_followers = $7, profile_following = $8, profile_posts_total = $9, \
             profile_private = $10, profile_external_url = $11, profile_category = $12, \
             profile_picture_url = $13, post_id = $14, post_link = $15, post_caption = $16, \
             post_type = $17, post_media_count = $18, post_media_info = $19, \
             post_timestamp = $20, likes = $21, comments = $22, shares = $23, saves = $24, \
             video_views = $25, video_duration_secs = $26, hashtags = $27, \
             hashtag_count = $28, location_name = $29, engagement_rate = $30 \
         WHERE id = $1",
    )
    .bind(id);

    let result = bind_record(query, record).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Returns the most recent `limit` collections, newest first, optionally
/// restricted to one profile.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_collections(
    pool: &PgPool,
    profile_username: Option<&str>,
    limit: i64,
) -> Result<Vec<CollectionRow>, DbError> {
    let rows = sqlx::query_as::<_, CollectionRow>(&format!(
        "SELECT {COLLECTION_COLUMNS} FROM collections \
         WHERE ($1::text IS NULL OR profile_username = $1) \
         ORDER BY collected_at DESC, created_at DESC \
         LIMIT $2"
    ))
    .bind(profile_username)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use socwatch_core::normalize_username;
use socwatch_db::CollectionRow;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub(super) struct CollectionsQuery {
    pub username: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct CollectionItem {
    id: Uuid,
    profile_username: String,
    collected_at: DateTime<Utc>,
    profile_name: Option<String>,
    profile_handle: Option<String>,
    profile_bio: Option<String>,
    profile_followers: Option<i64>,
    profile_following: Option<i64>,
    profile_posts_total: Option<i64>,
    profile_private: bool,
    profile_external_url: Option<String>,
    profile_category: Option<String>,
    profile_picture_url: Option<String>,
    post_id: Option<String>,
    post_link: Option<String>,
    post_caption: Option<String>,
    post_type: Option<String>,
    post_media_count: Option<i32>,
    post_media_info: Option<serde_json::Value>,
    post_timestamp: Option<DateTime<Utc>>,
    likes: i64,
    comments: i64,
    shares: i64,
    saves: i64,
    video_views: i64,
    video_duration_secs: Option<f64>,
    hashtags: Vec<String>,
    hashtag_count: i32,
    location_name: Option<String>,
    engagement_rate: Decimal,
    created_at: DateTime<Utc>,
}

impl From<CollectionRow> for CollectionItem {
    fn from(row: CollectionRow) -> Self {
        Self {
            id: row.id,
            profile_username: row.profile_username,
            collected_at: row.collected_at,
            profile_name: row.profile_name,
            profile_handle: row.profile_handle,
            profile_bio: row.profile_bio,
            profile_followers: row.profile_followers,
            profile_following: row.profile_following,
            profile_posts_total: row.profile_posts_total,
            profile_private: row.profile_private,
            profile_external_url: row.profile_external_url,
            profile_category: row.profile_category,
            profile_picture_url: row.profile_picture_url,
            post_id: row.post_id,
            post_link: row.post_link,
            post_caption: row.post_caption,
            post_type: row.post_type,
            post_media_count: row.post_media_count,
            post_media_info: row.post_media_info,
            post_timestamp: row.post_timestamp,
            likes: row.likes,
            comments: row.comments,
            shares: row.shares,
            saves: row.saves,
            video_views: row.video_views,
            video_duration_secs: row.video_duration_secs,
            hashtags: row.hashtags,
            hashtag_count: row.hashtag_count,
            location_name: row.location_name,
            engagement_rate: row.engagement_rate,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_collections(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CollectionsQuery>,
) -> Result<Json<ApiResponse<Vec<CollectionItem>>>, ApiError> {
    let username = query
        .username
        .as_deref()
        .map(normalize_username)
        .filter(|u| !u.is_empty());

    let rows = socwatch_db::list_collections(
        &state.pool,
        username.as_deref(),
        normalize_limit(query.limit, DEFAULT_LIMIT, MAX_LIMIT),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(CollectionItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

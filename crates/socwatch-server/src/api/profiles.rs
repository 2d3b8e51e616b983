//! Monitored profile CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use socwatch_core::{normalize_username, DEFAULT_PLATFORM};
use socwatch_db::{NewProfile, ProfileRow, ProfileUpdate};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_INTERVAL_MINUTES: i32 = 60;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct CreateProfileRequest {
    pub username: String,
    pub platform: Option<String>,
    pub collection_interval_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateProfileRequest {
    pub active: Option<bool>,
    pub platform: Option<String>,
    pub collection_interval_minutes: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProfileItem {
    id: Uuid,
    username: String,
    platform: String,
    active: bool,
    collection_interval_minutes: i32,
    last_collected_at: Option<DateTime<Utc>>,
    total_collections: i32,
    status: String,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for ProfileItem {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            platform: row.platform,
            active: row.active,
            collection_interval_minutes: row.collection_interval_minutes,
            last_collected_at: row.last_collected_at,
            total_collections: row.total_collections,
            status: row.status,
            last_error: row.last_error,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn validate_interval(req_id: &str, minutes: i32) -> Result<(), ApiError> {
    if minutes > 0 {
        Ok(())
    } else {
        Err(ApiError::new(
            req_id,
            "validation_error",
            format!("collection_interval_minutes must be positive, got {minutes}"),
        ))
    }
}

fn validate_platform(req_id: &str, platform: &str) -> Result<String, ApiError> {
    let platform = platform.trim();
    if platform.is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "platform must not be empty",
        ));
    }
    Ok(platform.to_owned())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub(super) async fn list_profiles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ProfileItem>>>, ApiError> {
    let rows = socwatch_db::list_profiles(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ProfileItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/profiles: start monitoring a username. A leading `@` is
/// stripped.
pub(super) async fn create_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProfileItem>>), ApiError> {
    let rid = &req_id.0;

    let username = normalize_username(&body.username);
    if username.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "username must not be empty",
        ));
    }
    let platform = match body.platform.as_deref() {
        Some(p) => validate_platform(rid, p)?,
        None => DEFAULT_PLATFORM.to_owned(),
    };
    let interval = body
        .collection_interval_minutes
        .unwrap_or(DEFAULT_INTERVAL_MINUTES);
    validate_interval(rid, interval)?;

    let row = socwatch_db::create_profile(
        &state.pool,
        &NewProfile {
            username: &username,
            platform: &platform,
            collection_interval_minutes: interval,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(username = %row.username, "profile added");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: row.into(),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn update_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileItem>>, ApiError> {
    let rid = &req_id.0;

    if let Some(minutes) = body.collection_interval_minutes {
        validate_interval(rid, minutes)?;
    }
    let platform = body
        .platform
        .as_deref()
        .map(|p| validate_platform(rid, p))
        .transpose()?;

    let row = socwatch_db::update_profile(
        &state.pool,
        id,
        &ProfileUpdate {
            active: body.active,
            platform,
            collection_interval_minutes: body.collection_interval_minutes,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn delete_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    socwatch_db::delete_profile(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(%id, "profile deleted");
    Ok(StatusCode::NO_CONTENT)
}

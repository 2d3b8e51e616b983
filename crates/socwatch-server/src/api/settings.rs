use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use socwatch_db::SettingRow;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PutSettingRequest {
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SettingItem {
    key: String,
    value: Option<String>,
    /// Whether a non-empty value is stored, so masked secrets still read as set.
    is_set: bool,
    description: Option<String>,
    updated_at: DateTime<Utc>,
}

fn is_secret(key: &str) -> bool {
    key.ends_with("_api_key")
}

/// Keeps the last four characters of a secret, e.g. `••••••3f9a`.
fn mask(value: &str) -> String {
    let visible: String = {
        let chars: Vec<char> = value.chars().collect();
        let start = chars.len().saturating_sub(4);
        if chars.len() <= 8 {
            String::new()
        } else {
            chars[start..].iter().collect()
        }
    };
    format!("••••••{visible}")
}

impl From<SettingRow> for SettingItem {
    fn from(row: SettingRow) -> Self {
        let is_set = row.value.as_deref().is_some_and(|v| !v.trim().is_empty());
        let value = if is_secret(&row.key) {
            row.value.as_deref().filter(|_| is_set).map(mask)
        } else {
            row.value
        };
        Self {
            key: row.key,
            value,
            is_set,
            description: row.description,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn list_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<SettingItem>>>, ApiError> {
    let rows = socwatch_db::list_settings(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(SettingItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/settings/{key}: insert or replace one setting.
pub(super) async fn put_setting(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(key): Path<String>,
    Json(body): Json<PutSettingRequest>,
) -> Result<Json<ApiResponse<SettingItem>>, ApiError> {
    let key = key.trim();
    if key.is_empty() || key.len() > 100 {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "key must be 1-100 characters",
        ));
    }

    let value = body.value.as_deref().map(str::trim);
    let row = socwatch_db::upsert_setting(&state.pool, key, value, body.description.as_deref())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(key, "setting updated");

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

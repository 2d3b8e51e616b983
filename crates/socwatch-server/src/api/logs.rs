use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use socwatch_core::LogKind;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_LIMIT: i64 = 200;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub(super) struct LogsQuery {
    pub kind: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct LogItem {
    id: Uuid,
    kind: String,
    module: String,
    message: String,
    details: Option<serde_json::Value>,
    duration_ms: Option<i64>,
    created_at: DateTime<Utc>,
}

pub(super) async fn list_logs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<ApiResponse<Vec<LogItem>>>, ApiError> {
    let kind = query
        .kind
        .as_deref()
        .filter(|k| !k.is_empty())
        .map(str::parse::<LogKind>)
        .transpose()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let rows = socwatch_db::list_system_logs(
        &state.pool,
        kind,
        normalize_limit(query.limit, DEFAULT_LIMIT, MAX_LIMIT),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| LogItem {
            id: row.id,
            kind: row.kind,
            module: row.module,
            message: row.message,
            details: row.details,
            duration_ms: row.duration_ms,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

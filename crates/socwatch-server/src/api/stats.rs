use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct StatsData {
    total_profiles: i64,
    active_profiles: i64,
    total_collections: i64,
    error_logs: i64,
    last_collected_at: Option<DateTime<Utc>>,
}

pub(super) async fn get_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<StatsData>>, ApiError> {
    let stats = socwatch_db::dashboard_stats(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: StatsData {
            total_profiles: stats.total_profiles,
            active_profiles: stats.active_profiles,
            total_collections: stats.total_collections,
            error_logs: stats.error_logs,
            last_collected_at: stats.last_collected_at,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app_with, json_body};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[sqlx::test(migrations = "../../migrations")]
    async fn empty_database_reports_zeroes(pool: sqlx::PgPool) {
        let app = app_with(pool, "http://127.0.0.1:1");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/stats")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["total_profiles"], 0);
        assert_eq!(json["data"]["total_collections"], 0);
        assert!(json["data"]["last_collected_at"].is_null());
    }
}

//! `POST /api/v1/collect`: runs a collection invocation.
//!
//! Unlike the other endpoints this one answers with the flat
//! `{ success, results | error }` shape the dashboard's trigger button reads.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use socwatch_collector::{CollectRequest, ProfileResult};

use super::AppState;

#[derive(Debug, Serialize)]
struct CollectSuccess {
    success: bool,
    results: Vec<ProfileResult>,
}

#[derive(Debug, Serialize)]
struct CollectFailure {
    success: bool,
    error: String,
}

/// Parses the body leniently: empty or malformed input means "no options".
fn parse_request(body: &[u8]) -> CollectRequest {
    if body.iter().all(u8::is_ascii_whitespace) {
        return CollectRequest::default();
    }

    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "ignoring unparseable collect request body");
        CollectRequest::default()
    })
}

pub(super) async fn collect(State(state): State<AppState>, body: Bytes) -> Response {
    let request = parse_request(&body);

    match state.collector.run(&request).await {
        Ok(results) => (
            StatusCode::OK,
            Json(CollectSuccess {
                success: true,
                results,
            }),
        )
            .into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            tracing::warn!(error = %e, status = status.as_u16(), "collection invocation rejected");
            (
                status,
                Json(CollectFailure {
                    success: false,
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_request;
    use crate::api::test_support::{app_with, json_body};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RUN_SYNC_PATH: &str =
        "/acts/apify~instagram-profile-scraper/run-sync-get-dataset-items";

    fn post_collect(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/collect")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request")
    }

    async fn add_profile(pool: &sqlx::PgPool, username: &str) {
        sqlx::query("INSERT INTO monitored_profiles (id, username) VALUES ($1, $2)")
            .bind(uuid::Uuid::new_v4())
            .bind(username)
            .execute(pool)
            .await
            .expect("insert profile");
    }

    #[test]
    fn parse_request_tolerates_empty_and_invalid_bodies() {
        assert!(parse_request(b"").username.is_none());
        assert!(parse_request(b"  \n").username.is_none());
        assert!(parse_request(b"not json").username.is_none());
        assert!(parse_request(b"[1,2]").username.is_none());
        assert_eq!(
            parse_request(br#"{"username":"natgeo"}"#).username.as_deref(),
            Some("natgeo")
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn missing_api_key_is_400_with_error_log(pool: sqlx::PgPool) {
        add_profile(&pool, "natgeo").await;
        let app = app_with(pool.clone(), "http://127.0.0.1:1");

        let response = app.oneshot(post_collect("{}")).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"]
            .as_str()
            .is_some_and(|m| m.starts_with("API key not configured")));

        let errors: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM system_logs WHERE kind = 'error'")
                .fetch_one(&pool)
                .await
                .expect("count");
        assert_eq!(errors, 1);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn no_active_profiles_is_400(pool: sqlx::PgPool) {
        let app = app_with(pool, "http://127.0.0.1:1");

        let response = app
            .oneshot(post_collect(r#"{"api_key":"tok"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "no active profiles to collect");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn partial_failure_still_returns_200(pool: sqlx::PgPool) {
        let apify = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(RUN_SYNC_PATH))
            .and(query_param("token", "tok"))
            .and(wiremock::matchers::body_partial_json(serde_json::json!({
                "usernames": ["good"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "username": "good",
                "followersCount": 1000,
                "latestPosts": [
                    { "id": "p1", "likesCount": 100, "commentsCount": 20, "caption": "#a #b" }
                ]
            }])))
            .mount(&apify)
            .await;
        Mock::given(method("POST"))
            .and(path(RUN_SYNC_PATH))
            .and(wiremock::matchers::body_partial_json(serde_json::json!({
                "usernames": ["bad"]
            })))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream"))
            .mount(&apify)
            .await;

        add_profile(&pool, "good").await;
        add_profile(&pool, "bad").await;
        sqlx::query("UPDATE settings SET value = 'tok' WHERE key = 'apify_api_key'")
            .execute(&pool)
            .await
            .expect("set key");

        let app = app_with(pool.clone(), &apify.uri());
        let response = app.oneshot(post_collect("")).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        let results = json["results"].as_array().expect("results");
        assert_eq!(results.len(), 2);

        let good = results
            .iter()
            .find(|r| r["username"] == "good")
            .expect("good result");
        assert_eq!(good["success"], true);
        assert_eq!(good["inserted"], 1);
        assert_eq!(good["updated"], 0);
        assert!(good["duration"].is_u64());

        let bad = results
            .iter()
            .find(|r| r["username"] == "bad")
            .expect("bad result");
        assert_eq!(bad["success"], false);
        assert_eq!(bad["error"], "Apify API error 502: upstream");
        assert!(bad.get("inserted").is_none());

        let (likes, rate, tags): (i64, rust_decimal::Decimal, i32) = sqlx::query_as(
            "SELECT likes, engagement_rate, hashtag_count FROM collections WHERE post_id = 'p1'",
        )
        .fetch_one(&pool)
        .await
        .expect("collection row");
        assert_eq!(likes, 100);
        assert_eq!(rate.to_string(), "12.00");
        assert_eq!(tags, 2);

        let status: String =
            sqlx::query_scalar("SELECT status FROM monitored_profiles WHERE username = 'bad'")
                .fetch_one(&pool)
                .await
                .expect("status");
        assert_eq!(status, "error");
    }
}

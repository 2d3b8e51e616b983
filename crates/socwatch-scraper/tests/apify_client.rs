//! Integration tests for `ApifyClient` using wiremock HTTP mocks.

use socwatch_scraper::{ApifyClient, ScraperError};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RUN_SYNC_PATH: &str = "/acts/apify~instagram-profile-scraper/run-sync-get-dataset-items";

fn test_client(base_url: &str) -> ApifyClient {
    ApifyClient::with_base_url(30, "socwatch-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn scrape_profile_returns_dataset_items() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "username": "natgeo",
            "fullName": "National Geographic",
            "followersCount": 1000,
            "latestPosts": [
                { "id": "1", "likesCount": 10, "commentsCount": 2 }
            ]
        }
    ]);

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .and(query_param("token", "test-token"))
        .and(body_json(serde_json::json!({
            "usernames": ["natgeo"],
            "resultsLimit": 30
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client
        .scrape_profile("test-token", "natgeo", 30)
        .await
        .expect("should return items");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["username"], "natgeo");
}

#[tokio::test]
async fn scrape_profile_non_success_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("actor crashed"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .scrape_profile("test-token", "natgeo", 30)
        .await
        .expect_err("500 should fail");

    match err {
        ScraperError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "actor crashed");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn scrape_profile_unauthorized_message_includes_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":{"type":"token-not-valid"}}"#),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .scrape_profile("bad-token", "natgeo", 30)
        .await
        .expect_err("401 should fail");

    let message = err.to_string();
    assert!(message.starts_with("Apify API error 401"), "got {message}");
    assert!(message.contains("token-not-valid"));
    assert!(!message.contains("bad-token"));
}

#[tokio::test]
async fn scrape_profile_empty_dataset_is_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .scrape_profile("test-token", "ghost", 30)
        .await
        .expect_err("empty dataset should fail");

    assert!(matches!(err, ScraperError::EmptyResult { ref username } if username == "ghost"));
    assert_eq!(err.to_string(), "no data returned by the scraper for @ghost");
}

#[tokio::test]
async fn scrape_profile_forwards_results_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RUN_SYNC_PATH))
        .and(body_json(serde_json::json!({
            "usernames": ["nasa"],
            "resultsLimit": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client
        .scrape_profile("test-token", "nasa", 5)
        .await
        .expect("should succeed");
    assert_eq!(items.len(), 1);
}

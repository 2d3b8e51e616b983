//! HTTP client for Apify's synchronous actor-run endpoint.
//!
//! One call runs the Instagram profile scraper for a single username and
//! returns the dataset items as untyped JSON; shaping them into canonical
//! records is [`crate::normalize`]'s job.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::ProfileScraperInput;

const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";

/// Actor slug for `apify/instagram-profile-scraper`.
const INSTAGRAM_PROFILE_SCRAPER: &str = "apify~instagram-profile-scraper";

/// Client for the Apify v2 API.
///
/// The API token is supplied per call rather than held by the client: it is
/// resolved per collection invocation and may change between runs.
pub struct ApifyClient {
    client: Client,
    base_url: Url,
}

impl ApifyClient {
    /// Creates a client pointed at the production Apify API.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment (`/v2`).
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Runs the Instagram profile scraper for `username` and returns the
    /// dataset items.
    ///
    /// No retries are attempted; a slow actor run blocks until the client
    /// timeout elapses.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Api`] for any non-2xx response (body included).
    /// - [`ScraperError::EmptyResult`] when the run returns `null` or `[]`.
    /// - [`ScraperError::Deserialize`] when the body is not a JSON array.
    /// - [`ScraperError::Http`] on network failure or timeout.
    pub async fn scrape_profile(
        &self,
        api_key: &str,
        username: &str,
        results_limit: u32,
    ) -> Result<Vec<Value>, ScraperError> {
        let url = self.run_sync_url(INSTAGRAM_PROFILE_SCRAPER, api_key)?;
        let input = ProfileScraperInput {
            usernames: vec![username.to_owned()],
            results_limit,
        };

        tracing::debug!(username, results_limit, "calling Apify profile scraper");

        // The token travels in the query string; strip the URL from
        // transport errors so it never reaches logs or API responses.
        let response = self
            .client
            .post(url)
            .json(&input)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            return Err(ScraperError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_dataset_items(&body, username)
    }

    /// Builds `{base}/acts/{actor}/run-sync-get-dataset-items?token={key}`.
    fn run_sync_url(&self, actor: &str, api_key: &str) -> Result<Url, ScraperError> {
        let mut url = self
            .base_url
            .join(&format!("acts/{actor}/run-sync-get-dataset-items"))
            .map_err(|e| ScraperError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut().append_pair("token", api_key);
        Ok(url)
    }
}

/// Parses a dataset-items body, treating `null` and `[]` as an empty result.
fn parse_dataset_items(body: &str, username: &str) -> Result<Vec<Value>, ScraperError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ScraperError::Deserialize {
        context: format!("dataset items for @{username}"),
        source: e,
    })?;

    let items = match value {
        Value::Null => Vec::new(),
        other => {
            serde_json::from_value::<Vec<Value>>(other).map_err(|e| ScraperError::Deserialize {
                context: format!("dataset items for @{username}"),
                source: e,
            })?
        }
    };

    if items.is_empty() {
        return Err(ScraperError::EmptyResult {
            username: username.to_owned(),
        });
    }

    Ok(items)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

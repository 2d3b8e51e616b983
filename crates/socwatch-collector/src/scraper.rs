use async_trait::async_trait;
use serde_json::Value;
use socwatch_scraper::{ApifyClient, ScraperError};

/// Source of raw profile items for one username.
#[async_trait]
pub trait ProfileScraper: Send + Sync {
    async fn scrape_profile(
        &self,
        api_key: &str,
        username: &str,
        results_limit: u32,
    ) -> Result<Vec<Value>, ScraperError>;
}

#[async_trait]
impl ProfileScraper for ApifyClient {
    async fn scrape_profile(
        &self,
        api_key: &str,
        username: &str,
        results_limit: u32,
    ) -> Result<Vec<Value>, ScraperError> {
        ApifyClient::scrape_profile(self, api_key, username, results_limit).await
    }
}

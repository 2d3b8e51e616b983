use serde::Serialize;

/// Request body for the `apify~instagram-profile-scraper` actor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileScraperInput {
    pub usernames: Vec<String>,
    pub results_limit: u32,
}

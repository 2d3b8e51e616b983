//! `collect` command: one orchestrator pass against the configured database
//! and Apify endpoint.

use clap::Args;
use socwatch_collector::{CollectRequest, Collector, CollectorOptions, PgStore, ProfileResult};
use socwatch_scraper::ApifyClient;

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Collect a single username instead of every active profile
    #[arg(long)]
    pub username: Option<String>,

    /// Scraper API key; overrides the stored setting
    #[arg(long)]
    pub api_key: Option<String>,

    /// Maximum posts per profile hint forwarded with the request
    #[arg(long)]
    pub max_posts: Option<u32>,
}

impl CollectArgs {
    pub(crate) fn to_request(&self) -> CollectRequest {
        CollectRequest {
            username: self.username.clone(),
            api_key: self.api_key.clone(),
            max_posts: self.max_posts,
            ..CollectRequest::default()
        }
    }
}

pub(crate) fn format_result(result: &ProfileResult) -> String {
    if result.success {
        format!(
            "ok    @{} inserted={} updated={} ({} ms)",
            result.username,
            result.inserted.unwrap_or(0),
            result.updated.unwrap_or(0),
            result.duration_ms
        )
    } else {
        format!(
            "FAIL  @{} {} ({} ms)",
            result.username,
            result.error.as_deref().unwrap_or("unknown error"),
            result.duration_ms
        )
    }
}

/// Runs a collection pass and prints one line per profile.
///
/// Per-profile failures are reported but do not fail the command.
///
/// # Errors
///
/// Returns an error when the scraper client cannot be built or the run
/// aborts before any profile is attempted (missing API key, no active
/// profiles, store failure).
pub(crate) async fn run_collect(
    pool: sqlx::PgPool,
    config: &socwatch_core::AppConfig,
    args: &CollectArgs,
) -> anyhow::Result<()> {
    let scraper = ApifyClient::with_base_url(
        config.scraper_timeout_secs,
        &config.scraper_user_agent,
        &config.apify_base_url,
    )?;
    let collector = Collector::new(
        PgStore::new(pool),
        scraper,
        CollectorOptions {
            results_limit: config.scraper_results_limit,
            fallback_api_key: config.apify_api_key.clone(),
        },
    );

    let results = collector.run(&args.to_request()).await?;

    let failed = results.iter().filter(|r| !r.success).count();
    for result in &results {
        println!("{}", format_result(result));
    }
    if failed > 0 {
        tracing::warn!(failed, total = results.len(), "some profiles failed");
    }
    println!("collected {} profiles ({failed} failed)", results.len());
    Ok(())
}

//! Per-profile collection run.
//!
//! One invocation resolves the API key and the target profiles, then visits
//! each profile strictly in sequence: scrape, normalize, upsert, record the
//! outcome. A failing profile never aborts the batch.

use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use socwatch_core::{normalize_username, LogKind, ProfileStatus, DEFAULT_PLATFORM};
use socwatch_db::ProfileRow;
use socwatch_scraper::normalize_items;

use crate::audit::AuditLog;
use crate::error::{CollectError, ProfileError};
use crate::scraper::ProfileScraper;
use crate::store::CollectionStore;
use crate::upsert::{upsert_record, UpsertCounts};

/// Parameters of one collection invocation. Every field is optional.
///
/// `date_start`, `date_end` and `max_posts` are accepted for forward
/// compatibility but do not influence the scraper request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectRequest {
    pub username: Option<String>,
    pub api_key: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub max_posts: Option<u32>,
}

/// Outcome for one profile, in the order profiles were visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResult {
    pub username: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub struct CollectorOptions {
    /// `resultsLimit` sent to the scraper for every profile.
    pub results_limit: u32,
    /// Used when neither the request nor the settings table has a key.
    pub fallback_api_key: Option<String>,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            results_limit: 30,
            fallback_api_key: None,
        }
    }
}

pub struct Collector<S, P> {
    store: S,
    scraper: P,
    options: CollectorOptions,
}

impl<S, P> Collector<S, P>
where
    S: CollectionStore,
    P: ProfileScraper,
{
    pub fn new(store: S, scraper: P, options: CollectorOptions) -> Self {
        Self {
            store,
            scraper,
            options,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn scraper(&self) -> &P {
        &self.scraper
    }

    /// Runs one collection invocation.
    ///
    /// # Errors
    ///
    /// - [`CollectError::MissingApiKey`] when no key can be resolved; no
    ///   profile is contacted.
    /// - [`CollectError::NoActiveProfiles`] when the target set is empty.
    /// - [`CollectError::Internal`] when the store fails while resolving
    ///   the key or the profiles.
    pub async fn run(&self, request: &CollectRequest) -> Result<Vec<ProfileResult>, CollectError> {
        if request.date_start.is_some() || request.date_end.is_some() || request.max_posts.is_some()
        {
            tracing::debug!(
                date_start = ?request.date_start,
                date_end = ?request.date_end,
                max_posts = ?request.max_posts,
                "date range and post limit hints are not forwarded to the scraper"
            );
        }

        let audit = AuditLog::new(&self.store);

        let prepared = self.prepare(request).await;
        let (api_key, profiles) = match prepared {
            Ok(ready) => ready,
            Err(CollectError::Internal(message)) => {
                tracing::error!(error = %message, "collection run failed before visiting profiles");
                audit
                    .error(
                        "unexpected error during collection run",
                        Some(serde_json::json!({ "error": message })),
                        None,
                    )
                    .await;
                return Err(CollectError::Internal(message));
            }
            Err(other) => return Err(other),
        };

        tracing::info!(profiles = profiles.len(), "starting collection run");

        let mut results = Vec::with_capacity(profiles.len());
        for profile in &profiles {
            results.push(self.collect_profile(profile, &api_key).await);
        }

        let failed = results.iter().filter(|r| !r.success).count();
        tracing::info!(
            profiles = results.len(),
            failed,
            "collection run finished"
        );

        Ok(results)
    }

    /// Resolves the API key and the target profiles.
    async fn prepare(
        &self,
        request: &CollectRequest,
    ) -> Result<(String, Vec<ProfileRow>), CollectError> {
        let Some(api_key) = self.resolve_api_key(request.api_key.as_deref()).await? else {
            tracing::error!("collection requested without a configured API key");
            AuditLog::new(&self.store)
                .error("API key not configured", None, None)
                .await;
            return Err(CollectError::MissingApiKey);
        };

        let username = request
            .username
            .as_deref()
            .map(normalize_username)
            .filter(|u| !u.is_empty());

        let profiles = match username {
            Some(username) => self.resolve_single(&username).await?,
            None => self.store.active_profiles().await?,
        };

        if profiles.is_empty() {
            return Err(CollectError::NoActiveProfiles);
        }

        Ok((api_key, profiles))
    }

    /// Explicit key, then the settings table, then the configured fallback.
    async fn resolve_api_key(&self, explicit: Option<&str>) -> Result<Option<String>, CollectError> {
        if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(Some(key.to_owned()));
        }

        if let Some(key) = self.store.api_key_setting().await? {
            return Ok(Some(key));
        }

        Ok(self
            .options
            .fallback_api_key
            .clone()
            .filter(|k| !k.trim().is_empty()))
    }

    /// The active profile with `username`, auto-creating it when unknown.
    /// An existing but inactive profile yields an empty set.
    async fn resolve_single(&self, username: &str) -> Result<Vec<ProfileRow>, CollectError> {
        if let Some(profile) = self.store.active_profile(username).await? {
            return Ok(vec![profile]);
        }

        let created = self
            .store
            .create_profile_if_absent(username, DEFAULT_PLATFORM)
            .await?;
        if created.is_some() {
            tracing::info!(username, "auto-created monitored profile");
        }

        Ok(created.into_iter().collect())
    }

    async fn collect_profile(&self, profile: &ProfileRow, api_key: &str) -> ProfileResult {
        let started = Instant::now();
        let username = profile.username.as_str();
        let audit = AuditLog::new(&self.store);

        audit
            .info(&format!("starting collection: @{username}"))
            .await;

        let outcome = self.scrape_and_store(profile, api_key).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let duration_log = i64::try_from(duration_ms).ok();

        match outcome {
            Ok(counts) => {
                tracing::info!(
                    username,
                    inserted = counts.inserted,
                    updated = counts.updated,
                    duration_ms,
                    "profile collected"
                );
                audit
                    .write(
                        LogKind::Success,
                        &format!(
                            "collection finished: @{username} - {} new, {} updated",
                            counts.inserted, counts.updated
                        ),
                        Some(serde_json::json!({
                            "inserted": counts.inserted,
                            "updated": counts.updated,
                        })),
                        duration_log,
                    )
                    .await;

                ProfileResult {
                    username: username.to_owned(),
                    success: true,
                    inserted: Some(counts.inserted),
                    updated: Some(counts.updated),
                    error: None,
                    duration_ms,
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(username, error = %message, duration_ms, "profile collection failed");

                if let Err(db_err) = self.store.mark_error(profile.id, &message).await {
                    tracing::error!(
                        username,
                        error = %db_err,
                        "failed to record profile error state"
                    );
                }

                audit
                    .error(
                        &format!("collection failed: @{username}"),
                        Some(serde_json::json!({ "error": message })),
                        duration_log,
                    )
                    .await;

                ProfileResult {
                    username: username.to_owned(),
                    success: false,
                    inserted: None,
                    updated: None,
                    error: Some(message),
                    duration_ms,
                }
            }
        }
    }

    async fn scrape_and_store(
        &self,
        profile: &ProfileRow,
        api_key: &str,
    ) -> Result<UpsertCounts, ProfileError> {
        self.store
            .set_status(profile.id, ProfileStatus::Collecting)
            .await?;

        let items = self
            .scraper
            .scrape_profile(api_key, &profile.username, self.options.results_limit)
            .await?;

        let collected_at = Utc::now();
        let records = normalize_items(&items, &profile.username, collected_at);

        let mut counts = UpsertCounts::default();
        for record in &records {
            counts.record(upsert_record(&self.store, record).await?);
        }

        self.store.mark_success(profile.id, collected_at).await?;

        Ok(counts)
    }
}

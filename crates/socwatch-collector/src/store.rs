//! Persistence seam for the collector.
//!
//! [`CollectionStore`] names exactly the reads and writes a collection run
//! needs, so the orchestrator can run against Postgres ([`PgStore`]) or an
//! in-memory fake in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use socwatch_core::{NormalizedRecord, ProfileStatus, API_KEY_SETTING};
use socwatch_db::{DbError, NewSystemLog, ProfileRow};
use sqlx::PgPool;
use uuid::Uuid;

#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Scraper API key stored in the settings table, if any.
    async fn api_key_setting(&self) -> Result<Option<String>, DbError>;

    async fn active_profile(&self, username: &str) -> Result<Option<ProfileRow>, DbError>;

    async fn active_profiles(&self) -> Result<Vec<ProfileRow>, DbError>;

    /// Creates an active profile unless the username already exists.
    async fn create_profile_if_absent(
        &self,
        username: &str,
        platform: &str,
    ) -> Result<Option<ProfileRow>, DbError>;

    async fn set_status(&self, profile_id: Uuid, status: ProfileStatus) -> Result<(), DbError>;

    async fn mark_success(
        &self,
        profile_id: Uuid,
        collected_at: DateTime<Utc>,
    ) -> Result<(), DbError>;

    async fn mark_error(&self, profile_id: Uuid, message: &str) -> Result<(), DbError>;

    async fn find_collection(
        &self,
        profile_username: &str,
        post_id: &str,
    ) -> Result<Option<Uuid>, DbError>;

    async fn insert_collection(&self, record: &NormalizedRecord) -> Result<Uuid, DbError>;

    async fn update_collection(&self, id: Uuid, record: &NormalizedRecord)
        -> Result<(), DbError>;

    async fn append_log(&self, entry: &NewSystemLog<'_>) -> Result<(), DbError>;
}

/// [`CollectionStore`] backed by the Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectionStore for PgStore {
    async fn api_key_setting(&self) -> Result<Option<String>, DbError> {
        socwatch_db::get_setting_value(&self.pool, API_KEY_SETTING).await
    }

    async fn active_profile(&self, username: &str) -> Result<Option<ProfileRow>, DbError> {
        socwatch_db::get_active_profile_by_username(&self.pool, username).await
    }

    async fn active_profiles(&self) -> Result<Vec<ProfileRow>, DbError> {
        socwatch_db::list_active_profiles(&self.pool).await
    }

    async fn create_profile_if_absent(
        &self,
        username: &str,
        platform: &str,
    ) -> Result<Option<ProfileRow>, DbError> {
        socwatch_db::create_profile_if_absent(&self.pool, username, platform).await
    }

    async fn set_status(&self, profile_id: Uuid, status: ProfileStatus) -> Result<(), DbError> {
        socwatch_db::set_profile_status(&self.pool, profile_id, status).await
    }

    async fn mark_success(
        &self,
        profile_id: Uuid,
        collected_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        socwatch_db::mark_profile_success(&self.pool, profile_id, collected_at).await
    }

    async fn mark_error(&self, profile_id: Uuid, message: &str) -> Result<(), DbError> {
        socwatch_db::mark_profile_error(&self.pool, profile_id, message).await
    }

    async fn find_collection(
        &self,
        profile_username: &str,
        post_id: &str,
    ) -> Result<Option<Uuid>, DbError> {
        socwatch_db::find_collection_id(&self.pool, profile_username, post_id).await
    }

    async fn insert_collection(&self, record: &NormalizedRecord) -> Result<Uuid, DbError> {
        socwatch_db::insert_collection(&self.pool, record).await
    }

    async fn update_collection(
        &self,
        id: Uuid,
        record: &NormalizedRecord,
    ) -> Result<(), DbError> {
        socwatch_db::update_collection(&self.pool, id, record).await
    }

    async fn append_log(&self, entry: &NewSystemLog<'_>) -> Result<(), DbError> {
        socwatch_db::insert_system_log(&self.pool, entry).await?;
        Ok(())
    }
}

//! Dashboard counters.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DashboardStats {
    pub total_profiles: i64,
    pub active_profiles: i64,
    pub total_collections: i64,
    pub error_logs: i64,
    pub last_collected_at: Option<DateTime<Utc>>,
}

/// Computes the overview counters in a single round trip.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn dashboard_stats(pool: &PgPool) -> Result<DashboardStats, DbError> {
    let stats = sqlx::query_as::<_, DashboardStats>(
        "SELECT \
             (SELECT COUNT(*) FROM monitored_profiles) AS total_profiles, \
             (SELECT COUNT(*) FROM monitored_profiles WHERE active = true) AS active_profiles, \
             (SELECT COUNT(*) FROM collections) AS total_collections, \
             (SELECT COUNT(*) FROM system_logs WHERE kind = 'error') AS error_logs, \
             (SELECT MAX(last_collected_at) FROM monitored_profiles) AS last_collected_at",
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

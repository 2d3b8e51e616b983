//! Canonical records produced by the scraper normalizer and persisted as
//! `collections` rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Profile snapshot fields, copied onto every collection row of a scrape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    pub name: Option<String>,
    /// Handle as reported by the scraper; falls back to the monitored username.
    pub handle: String,
    pub bio: Option<String>,
    pub followers: Option<i64>,
    pub following: Option<i64>,
    pub posts_total: Option<i64>,
    pub is_private: bool,
    pub external_url: Option<String>,
    pub category: Option<String>,
    pub picture_url: Option<String>,
}

/// One scraped post with its metrics and derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPost {
    /// Identity used for deduplication. `None` only when the item carried no
    /// id, short code, or URL at all.
    pub post_id: Option<String>,
    pub link: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub caption: Option<String>,
    /// `"image"`, `"video"`, `"sidecar"`, ... as reported, or inferred.
    pub post_type: String,
    pub media_count: i32,
    pub media_info: Option<serde_json::Value>,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub saves: i64,
    pub video_views: i64,
    pub video_duration_secs: Option<f64>,
    pub hashtags: Vec<String>,
    pub location_name: Option<String>,
    pub engagement_rate: Decimal,
}

impl NormalizedPost {
    #[must_use]
    pub fn hashtag_count(&self) -> i32 {
        i32::try_from(self.hashtags.len()).unwrap_or(i32::MAX)
    }
}

/// A single row-to-be in `collections`: a profile snapshot, optionally with
/// one post merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// The monitored profile this record belongs to.
    pub profile_username: String,
    pub collected_at: DateTime<Utc>,
    pub profile: NormalizedProfile,
    pub post: Option<NormalizedPost>,
}

impl NormalizedRecord {
    /// Engagement rate stored on the row; profile-only snapshots are always zero.
    #[must_use]
    pub fn engagement_rate(&self) -> Decimal {
        self.post
            .as_ref()
            .map_or(Decimal::new(0, 2), |p| p.engagement_rate)
    }

    /// Deduplication key: the post id, when this record carries a post.
    #[must_use]
    pub fn post_id(&self) -> Option<&str> {
        self.post.as_ref().and_then(|p| p.post_id.as_deref())
    }
}

//! Normalization from raw Apify dataset items to [`socwatch_core::NormalizedRecord`].
//!
//! The actor's output schema is not contractually stable, so every field is
//! read through [`crate::fields::Fields`] with the historical key names listed
//! in order of preference.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use socwatch_core::{
    calculate_engagement_rate, extract_hashtags, NormalizedPost, NormalizedProfile,
    NormalizedRecord,
};

use crate::fields::Fields;

const POST_LIST_KEYS: &[&str] = &["latestPosts", "posts"];

/// Timestamps above this are taken to be milliseconds since the epoch.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Zone-less layouts read as UTC when a string is not RFC 3339.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Normalizes every item of a scraper response.
#[must_use]
pub fn normalize_items(
    items: &[Value],
    profile_username: &str,
    collected_at: DateTime<Utc>,
) -> Vec<NormalizedRecord> {
    items
        .iter()
        .flat_map(|item| normalize_item(item, profile_username, collected_at))
        .collect()
}

/// Normalizes one raw item into one record per post, or a single
/// profile-only record when the item carries no posts.
#[must_use]
pub fn normalize_item(
    item: &Value,
    profile_username: &str,
    collected_at: DateTime<Utc>,
) -> Vec<NormalizedRecord> {
    let fields = Fields::new(item);
    let profile = normalize_profile(fields, profile_username);

    let record = |post: Option<NormalizedPost>| NormalizedRecord {
        profile_username: profile_username.to_owned(),
        collected_at,
        profile: profile.clone(),
        post,
    };

    match fields.non_empty_array(POST_LIST_KEYS) {
        Some(posts) => posts
            .iter()
            .map(|p| record(Some(normalize_post(p, profile.followers))))
            .collect(),
        None => vec![record(None)],
    }
}

/// Extracts the profile snapshot fields from a raw item.
#[must_use]
pub fn normalize_profile(fields: Fields<'_>, profile_username: &str) -> NormalizedProfile {
    NormalizedProfile {
        name: fields.string(&["fullName", "profileName"]),
        handle: fields
            .string(&["username"])
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| profile_username.to_owned()),
        bio: fields.string(&["biography", "bio"]),
        followers: fields.int(&["followersCount", "followers"]),
        following: fields.int(&["followingCount", "following"]),
        posts_total: fields.int(&["postsCount", "posts"]),
        is_private: fields.bool(&["isPrivate"]).unwrap_or(false),
        external_url: fields.string(&["externalUrl", "website"]),
        category: fields.string(&["businessCategory", "category"]),
        picture_url: fields.string(&["profilePicUrl", "profilePicture"]),
    }
}

/// Maps one raw post to a [`NormalizedPost`], computing hashtags and the
/// engagement rate against `followers`. An unknown or zero follower count
/// divides by one, so the rate is `(likes + comments) * 100`.
#[must_use]
pub fn normalize_post(post: &Value, followers: Option<i64>) -> NormalizedPost {
    let fields = Fields::new(post);

    let short_code = fields.id(&["shortCode"]);
    let link = fields
        .string(&["url"])
        .filter(|s| !s.is_empty())
        .or_else(|| {
            short_code
                .as_ref()
                .map(|code| format!("https://www.instagram.com/p/{code}/"))
        });

    let caption = fields.string(&["caption", "text"]);
    let hashtags = caption.as_deref().map(extract_hashtags).unwrap_or_default();

    let post_type = fields
        .string(&["type"])
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            if has_video(fields) {
                "video".to_owned()
            } else {
                "image".to_owned()
            }
        });

    let media_count = fields
        .non_empty_array(&["images", "displayResources"])
        .map_or(1, |a| i32::try_from(a.len()).unwrap_or(i32::MAX));

    let likes = fields.int(&["likesCount", "likes"]).unwrap_or(0);
    let comments = fields.int(&["commentsCount", "comments"]).unwrap_or(0);

    let location_name = fields.string(&["locationName"]).or_else(|| {
        fields
            .nested("location")
            .and_then(|loc| loc.string(&["name"]))
    });

    NormalizedPost {
        post_id: fields.id(&["id", "shortCode", "url"]),
        link,
        timestamp: fields
            .raw(&["timestamp", "takenAt", "date"])
            .and_then(parse_timestamp),
        caption,
        post_type,
        media_count,
        media_info: fields.raw(&["displayResources", "images"]).cloned(),
        likes,
        comments,
        shares: fields.int(&["sharesCount"]).unwrap_or(0),
        saves: fields.int(&["savesCount"]).unwrap_or(0),
        video_views: fields
            .int(&["videoViewCount", "videoPlayCount"])
            .unwrap_or(0),
        video_duration_secs: fields.float(&["videoDuration"]),
        hashtags,
        location_name,
        engagement_rate: calculate_engagement_rate(
            likes,
            comments,
            followers.filter(|&f| f != 0).unwrap_or(1),
        ),
    }
}

fn has_video(fields: Fields<'_>) -> bool {
    fields
        .string(&["videoUrl"])
        .is_some_and(|url| !url.is_empty())
}

/// Accepts RFC 3339 strings, zone-less `YYYY-MM-DD HH:MM:SS` strings (as
/// UTC) and unix timestamps (seconds or milliseconds).
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(|raw| {
            if raw.abs() >= MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(raw)
            } else {
                DateTime::from_timestamp(raw, 0)
            }
        }),
        _ => None,
    };
    if parsed.is_none() {
        tracing::debug!(value = %value, "discarding unparseable post timestamp");
    }
    parsed
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

pub mod app_config;
pub mod config;
pub mod logs;
pub mod metrics;
pub mod profiles;
pub mod records;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use logs::LogKind;
pub use metrics::{calculate_engagement_rate, extract_hashtags};
pub use profiles::{normalize_username, ProfileStatus, DEFAULT_PLATFORM};
pub use records::{NormalizedPost, NormalizedProfile, NormalizedRecord};

use thiserror::Error;

/// Setting key under which the scraper API token is stored.
pub const API_KEY_SETTING: &str = "apify_api_key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid profile status: {0}")]
    InvalidProfileStatus(String),

    #[error("invalid log kind: {0}")]
    InvalidLogKind(String),
}

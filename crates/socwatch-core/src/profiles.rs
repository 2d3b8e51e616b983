use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Platform assigned to profiles created without an explicit one.
pub const DEFAULT_PLATFORM: &str = "instagram";

/// Run state of a monitored profile, reflecting its most recent collection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Pending,
    Collecting,
    Success,
    Error,
}

impl ProfileStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileStatus::Pending => "pending",
            ProfileStatus::Collecting => "collecting",
            ProfileStatus::Success => "success",
            ProfileStatus::Error => "error",
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProfileStatus::Pending),
            "collecting" => Ok(ProfileStatus::Collecting),
            "success" => Ok(ProfileStatus::Success),
            "error" => Ok(ProfileStatus::Error),
            other => Err(CoreError::InvalidProfileStatus(other.to_owned())),
        }
    }
}

/// Strips surrounding whitespace and a leading `@` from a user-entered handle.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_owned()
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Severity/outcome tag of a `system_logs` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Info,
    Success,
    Error,
    Warning,
}

impl LogKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Info => "info",
            LogKind::Success => "success",
            LogKind::Error => "error",
            LogKind::Warning => "warning",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(LogKind::Info),
            "success" => Ok(LogKind::Success),
            "error" => Ok(LogKind::Error),
            "warning" => Ok(LogKind::Warning),
            other => Err(CoreError::InvalidLogKind(other.to_owned())),
        }
    }
}

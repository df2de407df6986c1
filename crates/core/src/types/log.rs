//! Application log records and aggregate statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::LogId;
use super::status::{LogLevel, LogSource};

/// A single application log record. Append-only on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationLog {
    pub id: LogId,
    pub level: LogLevel,
    #[serde(default = "unknown_source")]
    pub source: LogSource,
    pub message: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Milliseconds.
    #[serde(default)]
    pub response_time: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

const fn unknown_source() -> LogSource {
    LogSource::Unknown
}

/// Window for log statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogTimeframe {
    #[serde(rename = "1h")]
    LastHour,
    #[default]
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
}

impl LogTimeframe {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastHour => "1h",
            Self::LastDay => "24h",
            Self::LastWeek => "7d",
            Self::LastMonth => "30d",
        }
    }
}

impl std::fmt::Display for LogTimeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogTimeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1h" => Ok(Self::LastHour),
            "24h" | "1d" => Ok(Self::LastDay),
            "7d" => Ok(Self::LastWeek),
            "30d" => Ok(Self::LastMonth),
            _ => Err(format!("invalid timeframe: {s} (expected 1h, 24h, 7d or 30d)")),
        }
    }
}

/// Aggregate counts over a timeframe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub by_level: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_source: BTreeMap<String, u64>,
}

impl LogStats {
    /// Count for one level, zero when absent.
    #[must_use]
    pub fn level_count(&self, level: LogLevel) -> u64 {
        self.by_level.get(level.as_str()).copied().unwrap_or(0)
    }
}

/// Result of a bulk cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogCleanup {
    #[serde(default)]
    pub deleted_count: u64,
    #[serde(default)]
    pub message: Option<String>,
}

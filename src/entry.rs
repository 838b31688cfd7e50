use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key used for unrecognized levels in level counts
pub const UNKNOWN_LEVEL_KEY: &str = "unknown";

/// Log severity. Matching is case-sensitive; anything outside the four
/// recognized names is kept verbatim as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Unknown(String),
}

impl Level {
    /// Recognized levels, least to most severe
    pub const RANKED: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

    pub fn parse(text: &str) -> Self {
        match text {
            "DEBUG" => Level::Debug,
            "INFO" => Level::Info,
            "WARN" => Level::Warn,
            "ERROR" => Level::Error,
            other => Level::Unknown(other.to_string()),
        }
    }

    /// Ordinal position in DEBUG < INFO < WARN < ERROR, `None` for unknown levels
    pub fn rank(&self) -> Option<u8> {
        match self {
            Level::Debug => Some(0),
            Level::Info => Some(1),
            Level::Warn => Some(2),
            Level::Error => Some(3),
            Level::Unknown(_) => None,
        }
    }

    /// True when this level is at least as severe as `min`.
    /// Unknown levels on either side never satisfy the comparison.
    pub fn at_least(&self, min: &Level) -> bool {
        match (self.rank(), min.rank()) {
            (Some(own), Some(min)) => own >= min,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Unknown(text) => text,
        }
    }

    /// Name of the bucket this level is counted under in stats
    pub fn bucket(&self) -> &str {
        match self {
            Level::Unknown(_) => UNKNOWN_LEVEL_KEY,
            known => known.as_str(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Level::parse(s))
    }
}

impl From<String> for Level {
    fn from(text: String) -> Self {
        match Level::parse(&text) {
            Level::Unknown(_) => Level::Unknown(text),
            known => known,
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        match level {
            Level::Unknown(text) => text,
            known => known.as_str().to_string(),
        }
    }
}

/// Durations must be finite and non-negative
pub fn is_valid_duration(ms: f64) -> bool {
    ms.is_finite() && ms >= 0.0
}

/// A parsed and validated log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 text, compared lexically and never parsed into a date
    pub timestamp: String,
    pub level: Level,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            level,
            message: message.into(),
            duration_ms: None,
            status_code: None,
            user_id: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_status(mut self, status_code: i64) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// The duration if it can be aggregated; NaN, infinite and negative values read as absent
    pub fn duration(&self) -> Option<f64> {
        self.duration_ms.filter(|ms| is_valid_duration(*ms))
    }
}

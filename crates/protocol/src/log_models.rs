//! Log record models relayed from a project to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

/// Severity of a relayed log record, ordered from least to most severe.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// A single log line produced on behalf of a project.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct LogRecord {
    /// Handle that produced the record.
    #[ts(type = "string")]
    pub project_id: Uuid,

    pub level: LogLevel,

    pub message: String,

    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(project_id: Uuid, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            project_id,
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

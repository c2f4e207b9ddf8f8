//! Runtime settings models for `stagekit.toml`.
//!
//! This module defines the settings that control how project handles log
//! and relay their output.

use crate::log_models::LogLevel;
use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Represents runtime settings from `stagekit.toml`.
///
/// # Example
///
/// ```toml
/// # stagekit.toml
/// log_level = "debug"
/// traceback_threshold = "debug"
/// buffer_logs_until_ready = true
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Settings {
    /// Records below this level are dropped by project loggers.
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// Failures are logged with their full error chain only when
    /// `log_level` is at or below this level.
    #[serde(default = "default_traceback_threshold")]
    pub traceback_threshold: LogLevel,

    /// Hold relayed log records until the consumer signals readiness.
    #[serde(default = "default_buffer_logs_until_ready")]
    pub buffer_logs_until_ready: bool,
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_traceback_threshold() -> LogLevel {
    LogLevel::Debug
}

fn default_buffer_logs_until_ready() -> bool {
    true
}

impl Settings {
    /// Whether failures should be logged with their full error chain.
    pub fn show_traceback(&self) -> bool {
        self.log_level <= self.traceback_threshold
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            traceback_threshold: default_traceback_threshold(),
            buffer_logs_until_ready: default_buffer_logs_until_ready(),
        }
    }
}

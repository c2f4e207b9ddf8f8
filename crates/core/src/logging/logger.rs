//! Project-scoped logger.

use sk_protocol::config_models::Settings;
use sk_protocol::log_models::{LogLevel, LogRecord};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Logger handed to a project and used by the core on its behalf.
///
/// Every record is emitted as a `tracing` event tagged with the project id
/// and queued on the project's [`crate::logging::LogRelay`].
#[derive(Clone, Debug)]
pub struct ProjectLogger {
    project_id: Uuid,
    min_level: LogLevel,
    show_traceback: bool,
    relay: mpsc::UnboundedSender<LogRecord>,
}

impl ProjectLogger {
    pub fn new(
        project_id: Uuid,
        settings: &Settings,
        relay: mpsc::UnboundedSender<LogRecord>,
    ) -> Self {
        Self {
            project_id,
            min_level: settings.log_level,
            show_traceback: settings.show_traceback(),
            relay,
        }
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }

        let message = message.into();
        let project_id = self.project_id;
        match level {
            LogLevel::Trace => tracing::trace!(%project_id, "{message}"),
            LogLevel::Debug => tracing::debug!(%project_id, "{message}"),
            LogLevel::Info => tracing::info!(%project_id, "{message}"),
            LogLevel::Warning => tracing::warn!(%project_id, "{message}"),
            LogLevel::Error => tracing::error!(%project_id, "{message}"),
        }

        // Relay is gone after teardown; the tracing event above still went out.
        let _ = self
            .relay
            .send(LogRecord::new(self.project_id, level, message));
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Log a failure at error level.
    ///
    /// The full error chain is included only when the configured log level
    /// is verbose enough (see [`Settings::show_traceback`]).
    pub fn failure(&self, context: &str, error: &anyhow::Error) {
        if self.show_traceback {
            self.error(format!("{context}: {error:?}"));
        } else {
            self.error(format!("{context}: {error}"));
        }
    }
}

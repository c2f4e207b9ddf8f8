//! Console logging for the CLI.

use sk_protocol::log_models::LogLevel;
use tracing_subscriber::EnvFilter;

/// Map a project log level onto the closest `tracing` level.
fn tracing_level(level: LogLevel) -> tracing::Level {
    match level {
        LogLevel::Trace => tracing::Level::TRACE,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Warning => tracing::Level::WARN,
        LogLevel::Error => tracing::Level::ERROR,
    }
}

/// Initialize console logging on stderr.
///
/// `RUST_LOG` overrides the configured level.
pub fn init_cli_logging(level: LogLevel) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! Per-project logging.
//!
//! - [`ProjectLogger`]: what projects and the core log through
//! - [`LogRelay`]: background task forwarding records to the notification bus

pub mod logger;
pub mod relay;

pub use logger::ProjectLogger;
pub use relay::LogRelay;

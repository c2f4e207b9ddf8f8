//! Settings loading.
//!
//! This module loads the runtime [`sk_protocol::config_models::Settings`]
//! from an optional `stagekit.toml` file.

pub mod error;
pub mod loader;

//! # sk-protocol
//!
//! Core protocol definitions and data models for stagekit.
//!
//! This crate defines all shared data structures used for:
//! - Project lifecycle stages and their snapshots
//! - Action requests and results
//! - Log records relayed to the presentation layer
//! - Communication between a consumer and the core
//!
//! ## Modules
//!
//! - [`stage_models`]: Stages, stage sets and pseudo-stages
//! - [`action_models`]: Action requests and results
//! - [`log_models`]: Log levels and relayed records
//! - [`config_models`]: Runtime settings from `stagekit.toml`
//! - [`ipc`]: Operations and Events for consumer-core communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, serde_json, ts-rs, uuid and chrono
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other stagekit crates

pub mod action_models;
pub mod config_models;
pub mod ipc;
pub mod log_models;
pub mod stage_models;

// Re-export all public types for convenience
pub use action_models::*;
pub use config_models::*;
pub use ipc::*;
pub use log_models::*;
pub use stage_models::*;

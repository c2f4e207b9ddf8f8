//! # sk-core
//!
//! Coordination layer for stagekit projects.
//!
//! This crate provides:
//! - Asynchronous project construction behind a cheap, immediately usable handle
//! - A serialized, per-project action queue that flushes pending work on failure
//! - Push-style notifications with a readiness handshake
//! - Deterministic teardown that drains in-flight work
//!
//! ## Modules
//!
//! - [`project`]: Seams to the external project collaborator
//! - [`queue`]: Single-worker FIFO action queue
//! - [`bus`]: Per-handle notification bus
//! - [`logging`]: Project logger and log relay
//! - [`handle`]: Project handle, initialization and teardown
//! - [`projects`]: Manager for many project handles
//! - [`config`]: Settings loading

pub mod bus;
pub mod config;
pub mod handle;
pub mod logging;
pub mod project;
pub mod projects;
pub mod queue;

pub use handle::{HandleError, HandleStatus, ProjectHandle};
pub use project::{Project, ProjectArgs, ProjectFactory};

//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality across all integration tests:
//! - Scripted collaborator projects and their factory
//! - Event collection helpers
//! - Custom assertions

pub mod assertions;
pub mod fixtures;
pub mod mock_projects;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_projects::*;

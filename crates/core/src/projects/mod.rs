//! Collection of project handles.
//!
//! This module provides:
//! - ProjectManager for creating, looking up and disposing many handles

pub mod manager;

pub use manager::ProjectManager;

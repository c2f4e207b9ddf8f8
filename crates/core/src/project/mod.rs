//! Seams to the external project collaborator.
//!
//! The core never performs project operations itself. A [`ProjectFactory`]
//! builds a [`Project`], and the project exposes its operations through a
//! statically built [`ActionRegistry`].

pub mod registry;

pub use registry::{ActionFn, ActionFuture, ActionRegistry, RegistryError};

use crate::logging::ProjectLogger;
use async_trait::async_trait;
use serde_json::Value;
use sk_protocol::stage_models::StageSet;
use std::collections::{BTreeMap, HashMap};

/// Project configuration as `section -> key -> value`.
pub type ProjectConfig = BTreeMap<String, BTreeMap<String, String>>;

/// An underlying project object.
///
/// A project is exclusively owned by its handle and is only ever touched by
/// one task at a time: either the action queue worker or a state query.
pub trait Project: Send + Sized + 'static {
    /// Canonical human-readable name.
    fn name(&self) -> String;

    /// Compute which stages have been reached. May perform I/O.
    fn state(&self) -> StageSet;

    /// The operations this project type supports.
    ///
    /// Called once per handle, right after construction.
    fn actions() -> ActionRegistry<Self>;

    /// Project configuration, if the project has any.
    fn config(&self) -> ProjectConfig {
        ProjectConfig::new()
    }
}

/// Builds [`Project`]s from construction arguments.
///
/// Construction is potentially slow and runs on a background task. Any
/// error is terminal for the handle that requested it.
#[async_trait]
pub trait ProjectFactory: Send + Sync + 'static {
    type Project: Project;

    async fn construct(
        &self,
        args: ProjectArgs,
        logger: ProjectLogger,
    ) -> anyhow::Result<Self::Project>;
}

/// Construction arguments for a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectArgs {
    /// Positional arguments. By convention the first one is the project path.
    pub args: Vec<String>,

    /// Named options passed through to the factory.
    pub options: HashMap<String, Value>,
}

impl ProjectArgs {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            options: HashMap::new(),
        }
    }

    /// Shorthand for a single positional path argument.
    pub fn path(path: impl Into<String>) -> Self {
        Self::new(vec![path.into()])
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn first(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

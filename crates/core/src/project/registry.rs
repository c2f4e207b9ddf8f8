//! Statically built action registry.
//!
//! Maps action names to plain function pointers with a fixed arity. The
//! registry is built once per project type, so unknown names and wrong
//! argument counts can be rejected at submission time instead of surfacing
//! in the middle of a queue.

use serde_json::Value;
use sk_protocol::action_models::Action;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Future returned by a project operation.
pub type ActionFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// A project operation: exclusive access to the project plus its arguments.
pub type ActionFn<P> = for<'a> fn(&'a mut P, Vec<Value>) -> ActionFuture<'a>;

/// Reasons an action cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Action '{action}' takes {expected} argument(s), got {got}")]
    ArityMismatch {
        action: String,
        expected: usize,
        got: usize,
    },
}

struct ActionEntry<P> {
    arity: usize,
    func: ActionFn<P>,
}

/// Name to operation mapping for a project type.
pub struct ActionRegistry<P> {
    entries: HashMap<String, ActionEntry<P>>,
}

impl<P> ActionRegistry<P> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register an operation under `name` taking exactly `arity` arguments.
    ///
    /// Registering the same name twice replaces the earlier entry.
    pub fn register(mut self, name: impl Into<String>, arity: usize, func: ActionFn<P>) -> Self {
        self.entries.insert(name.into(), ActionEntry { arity, func });
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered action names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check that the action exists and is called with the right arity.
    pub fn validate(&self, action: &Action) -> Result<(), RegistryError> {
        self.resolve(action).map(|_| ())
    }

    /// Look up the operation for an action.
    pub fn resolve(&self, action: &Action) -> Result<ActionFn<P>, RegistryError> {
        let entry = self
            .entries
            .get(&action.name)
            .ok_or_else(|| RegistryError::UnknownAction(action.name.clone()))?;

        if entry.arity != action.args.len() {
            return Err(RegistryError::ArityMismatch {
                action: action.name.clone(),
                expected: entry.arity,
                got: action.args.len(),
            });
        }

        Ok(entry.func)
    }
}

impl<P> Default for ActionRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

//! Action request and result models.
//!
//! Actions are opaque to the queue that runs them: a name that the owning
//! project resolves through its action registry, plus positional arguments.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A request to run a named project operation.
///
/// # Example
///
/// ```json
/// { "name": "build", "args": [] }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Action {
    /// Name of the operation in the project's action registry.
    pub name: String,

    /// Positional arguments, passed through to the operation untouched.
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

impl Action {
    pub fn new(name: impl Into<String>, args: Vec<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// An action without arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

/// Outcome of a single action invocation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
pub struct ActionResult {
    pub succeeded: bool,
}

impl ActionResult {
    pub fn success() -> Self {
        Self { succeeded: true }
    }

    pub fn failure() -> Self {
        Self { succeeded: false }
    }
}

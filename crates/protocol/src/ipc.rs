//! Consumer-core communication protocol.
//!
//! This module defines the message types exchanged between a consumer
//! (typically a presentation layer) and a project handle in the core.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent from the consumer to a project handle
//! - `Event`: Notifications pushed from a project handle to its subscribers
//!
//! Events carry no state snapshot except where noted. Observers re-query the
//! handle (`name`, `stage_map`, `current_stage`, ...) when notified.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::log_models::LogLevel;

/// Operations sent from the consumer to a project handle.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "submitAction",
///   "payload": {
///     "name": "build",
///     "args": []
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Queue a named action for execution.
    SubmitAction {
        /// Name of the operation in the project's action registry.
        name: String,
        /// Positional arguments for the operation.
        #[serde(default)]
        args: Vec<serde_json::Value>,
    },

    /// The consumer has finished its own setup and can receive events.
    SignalReady,

    /// Drain the queue and release the handle's resources.
    Dispose,
}

/// Events pushed from a project handle to its subscribers.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "actionFinished",
///   "payload": {
///     "project_id": "uuid-here",
///     "action": "build",
///     "success": true
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A log line was relayed from the project.
    LogAdded {
        #[ts(type = "string")]
        project_id: Uuid,
        message: String,
        level: LogLevel,
    },

    /// Construction of the underlying project has concluded, either way.
    ///
    /// Fires exactly once per handle, after the readiness handshake.
    Initialized {
        #[ts(type = "string")]
        project_id: Uuid,
    },

    /// The display name may have changed.
    NameChanged {
        #[ts(type = "string")]
        project_id: Uuid,
    },

    /// The current stage may have changed.
    StageChanged {
        #[ts(type = "string")]
        project_id: Uuid,
    },

    /// The stage map may have changed.
    StateChanged {
        #[ts(type = "string")]
        project_id: Uuid,
    },

    /// An action is about to be invoked. `current_action` is already set.
    ActionStarted {
        #[ts(type = "string")]
        project_id: Uuid,
        action: String,
    },

    /// An action has completed. `current_action` is still set while this is
    /// delivered and is cleared right after.
    ActionFinished {
        #[ts(type = "string")]
        project_id: Uuid,
        action: String,
        success: bool,
    },
}

impl Event {
    /// The handle this event originates from.
    pub fn project_id(&self) -> Uuid {
        match self {
            Event::LogAdded { project_id, .. }
            | Event::Initialized { project_id }
            | Event::NameChanged { project_id }
            | Event::StageChanged { project_id }
            | Event::StateChanged { project_id }
            | Event::ActionStarted { project_id, .. }
            | Event::ActionFinished { project_id, .. } => *project_id,
        }
    }
}

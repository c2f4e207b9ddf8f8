//! Usage errors surfaced synchronously by a project handle.

use crate::handle::HandleStatus;
use crate::project::RegistryError;
use thiserror::Error;

/// Errors caused by using a [`crate::handle::ProjectHandle`] incorrectly.
///
/// Construction and action failures never show up here; they are turned
/// into handle state and events instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// The handle is being or has been disposed.
    #[error("Project handle has been disposed")]
    Disposed,

    /// `dispose` was called more than once.
    #[error("Project handle was already disposed")]
    AlreadyDisposed,

    /// A stage query was made while the project has no live object.
    #[error("Project is not ready (status: {0})")]
    NotReady(HandleStatus),

    /// The project failed to initialize and accepts no actions.
    #[error("Project failed to initialize")]
    InitFailed,

    /// The action is not in the project's registry or has the wrong arity.
    #[error(transparent)]
    InvalidAction(#[from] RegistryError),
}

/// Type alias for Result with HandleError.
pub type HandleResult<T> = Result<T, HandleError>;

//! Project manager for coordinating multiple project handles.
//!
//! The ProjectManager keeps the list of open projects in the order they were
//! added. Each project runs its own queue; the manager never orders work
//! across projects.

use crate::handle::ProjectHandle;
use crate::project::{ProjectArgs, ProjectFactory};
use anyhow::Result;
use futures::future::join_all;
use sk_protocol::config_models::Settings;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

type Handle<F> = Arc<ProjectHandle<<F as ProjectFactory>::Project>>;

/// Manages all open project handles built by one factory.
pub struct ProjectManager<F: ProjectFactory> {
    /// Open handles, in insertion order.
    handles: Mutex<Vec<Handle<F>>>,

    factory: Arc<F>,

    settings: Settings,
}

impl<F: ProjectFactory> ProjectManager<F> {
    /// Create an empty ProjectManager.
    ///
    /// # Arguments
    ///
    /// * `factory` - Builds the underlying project of every handle
    /// * `settings` - Logging settings shared by every handle
    pub fn new(factory: Arc<F>, settings: Settings) -> Self {
        Self {
            handles: Mutex::new(Vec::new()),
            factory,
            settings,
        }
    }

    /// Open a project.
    ///
    /// The handle is returned right away in `Loading`; construction
    /// continues in the background.
    pub async fn add_project(&self, args: ProjectArgs, from_startup: bool) -> Handle<F> {
        let handle = Arc::new(ProjectHandle::new(
            Arc::clone(&self.factory),
            args,
            &self.settings,
            from_startup,
        ));

        self.handles.lock().await.push(Arc::clone(&handle));
        handle
    }

    pub async fn get(&self, project_id: Uuid) -> Option<Handle<F>> {
        self.handles
            .lock()
            .await
            .iter()
            .find(|handle| handle.id() == project_id)
            .cloned()
    }

    /// All open handles, in the order they were added.
    pub async fn projects(&self) -> Vec<Handle<F>> {
        self.handles.lock().await.clone()
    }

    pub async fn project_count(&self) -> usize {
        self.handles.lock().await.len()
    }

    /// Remove a project and dispose of it.
    ///
    /// Waits for the project's queued actions to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is not found or was already disposed.
    pub async fn remove_project(&self, project_id: Uuid) -> Result<()> {
        let handle = {
            let mut handles = self.handles.lock().await;
            let index = handles
                .iter()
                .position(|handle| handle.id() == project_id)
                .ok_or_else(|| anyhow::anyhow!("Project {project_id} not found"))?;
            handles.remove(index)
        };

        handle.dispose().await?;
        Ok(())
    }

    /// Dispose of every project concurrently and empty the manager.
    pub async fn dispose_all(&self) {
        let handles: Vec<Handle<F>> = std::mem::take(&mut *self.handles.lock().await);

        let results = join_all(handles.iter().map(|handle| handle.dispose())).await;
        for (handle, result) in handles.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(project_id = %handle.id(), "dispose failed: {e}");
            }
        }
    }
}

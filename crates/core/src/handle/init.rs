//! Background construction of a handle's underlying project.

use crate::bus::NotificationBus;
use crate::handle::{InitState, Shared};
use crate::logging::ProjectLogger;
use crate::project::{Project, ProjectArgs, ProjectFactory};
use futures::FutureExt;
use sk_protocol::stage_models::{PseudoStage, Stage};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Display name while the project is being constructed.
pub const LOADING_NAME: &str = "Loading...";

/// Display name after a failed construction without construction arguments.
pub const PLACEHOLDER_NAME: &str = "Undefined";

pub(crate) async fn initialize<F>(
    shared: Arc<Shared<F::Project>>,
    factory: Arc<F>,
    args: ProjectArgs,
    logger: ProjectLogger,
    bus: NotificationBus,
    mut ready_rx: watch::Receiver<bool>,
) where
    F: ProjectFactory,
{
    let fallback_name = args.first().unwrap_or(PLACEHOLDER_NAME).to_string();

    let constructed = AssertUnwindSafe(factory.construct(args, logger.clone()))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| Err(anyhow::anyhow!("project construction panicked")));

    // The handle must leave Loading whatever the project does here.
    let prepared = constructed.and_then(|project| {
        catch_unwind(AssertUnwindSafe(|| {
            (project.name(), <F::Project as Project>::actions())
        }))
        .map(|(name, actions)| (project, name, actions))
        .map_err(|_| anyhow::anyhow!("project setup panicked"))
    });

    match prepared {
        Ok((project, name, actions)) => {
            {
                let mut snapshot = shared.snapshot();
                snapshot.name = name;
                // Placeholder until the first stage query.
                snapshot.current_stage = Stage::Initialized.to_string();
            }
            shared.init.send_replace(InitState::Ready {
                project: Arc::new(Mutex::new(project)),
                actions: Arc::new(actions),
            });
            logger.debug("project initialized");
        }
        Err(e) => {
            logger.failure("failed to initialize project", &e);
            {
                let mut snapshot = shared.snapshot();
                snapshot.name = fallback_name;
                snapshot.current_stage = PseudoStage::InitError.to_string();
            }
            shared.init.send_replace(InitState::Failed);
        }
    }

    if ready_rx.wait_for(|ready| *ready).await.is_err() {
        tracing::debug!("handle dropped before the consumer signalled readiness");
        return;
    }

    bus.initialized();
    bus.name_changed();
    bus.stage_changed();
    bus.state_changed();
}

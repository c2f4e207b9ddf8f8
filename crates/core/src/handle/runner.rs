//! Bridges the action queue to a handle's cache, project and bus.

use crate::bus::NotificationBus;
use crate::handle::{InitState, Shared};
use crate::logging::ProjectLogger;
use crate::project::Project;
use crate::queue::ActionRunner;
use async_trait::async_trait;
use sk_protocol::action_models::{Action, ActionResult};
use std::sync::Arc;

pub(crate) struct HandleRunner<P> {
    shared: Arc<Shared<P>>,
    bus: NotificationBus,
    logger: ProjectLogger,
}

impl<P> HandleRunner<P> {
    pub(crate) fn new(shared: Arc<Shared<P>>, bus: NotificationBus, logger: ProjectLogger) -> Self {
        Self {
            shared,
            bus,
            logger,
        }
    }
}

#[async_trait]
impl<P: Project> ActionRunner for HandleRunner<P> {
    /// Hold the first action until construction has concluded.
    async fn prepare(&self) -> bool {
        let mut init_rx = self.shared.init.subscribe();
        let ready = match init_rx
            .wait_for(|state| !matches!(state, InitState::Loading))
            .await
        {
            Ok(state) => matches!(*state, InitState::Ready { .. }),
            Err(_) => false,
        };
        ready
    }

    fn started(&self, action: &Action) {
        // Set before the event: observers query it while handling ActionStarted.
        self.shared.snapshot().current_action = action.name.clone();
        self.bus.action_started(&action.name);
    }

    async fn invoke(&self, action: &Action) -> ActionResult {
        let Some((project, actions)) = self.shared.ready_parts() else {
            return ActionResult::failure();
        };

        let func = match actions.resolve(action) {
            Ok(func) => func,
            Err(e) => {
                self.logger.error(e.to_string());
                return ActionResult::failure();
            }
        };

        self.logger.debug(format!("running {}", action.name));
        let mut project = project.lock().await;
        match func(&mut *project, action.args.clone()).await {
            Ok(()) => ActionResult::success(),
            Err(e) => {
                self.logger
                    .failure(&format!("action '{}' failed", action.name), &e);
                ActionResult::failure()
            }
        }
    }

    fn finished(&self, action: &Action, result: ActionResult) {
        self.shared.snapshot().last_action_succeeded = result.succeeded;
        self.bus.action_finished(&action.name, result.succeeded);
        // Cleared only after delivery: observers query it while handling ActionFinished.
        self.shared.snapshot().current_action.clear();
        self.bus.state_changed();
        self.bus.stage_changed();
    }
}

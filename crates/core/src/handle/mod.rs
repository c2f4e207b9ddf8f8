//! Project handle: identity, cached display state and the action queue of a
//! single project.
//!
//! A [`ProjectHandle`] is created synchronously and starts out `Loading`. The
//! underlying [`Project`] is built on a background task which moves the
//! handle to `Ready` or `InitError` exactly once. Notifications about that
//! outcome are held back until the consumer calls
//! [`ProjectHandle::signal_ready`].
//!
//! Teardown is explicit: [`ProjectHandle::dispose`] waits for the queue to
//! drain and the log relay to stop. Neither wait has a timeout. An action
//! that never returns keeps `dispose` from returning; there is no way to
//! abort an in-flight action.

pub mod error;
mod init;
mod runner;

pub use error::{HandleError, HandleResult};
pub use init::{LOADING_NAME, PLACEHOLDER_NAME};

use crate::bus::{NotificationBus, Subscriber};
use crate::logging::{LogRelay, ProjectLogger};
use crate::project::{ActionRegistry, Project, ProjectArgs, ProjectConfig, ProjectFactory};
use crate::queue::ActionQueue;
use runner::HandleRunner;
use serde_json::Value;
use sk_protocol::action_models::Action;
use sk_protocol::config_models::Settings;
use sk_protocol::ipc::{Event, Op};
use sk_protocol::stage_models::{PseudoStage, StageMap};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard};
use tokio::sync::{mpsc, watch, Mutex};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::Instrument;
use uuid::Uuid;

/// Which of the three mutually exclusive states a handle is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleStatus {
    /// The underlying project is being constructed.
    Loading,
    /// Construction failed. Terminal.
    InitError,
    /// The underlying project is live.
    Ready,
}

impl HandleStatus {
    /// The pseudo-stage shown instead of a real stage, if any.
    pub fn pseudo_stage(&self) -> Option<PseudoStage> {
        match self {
            HandleStatus::Loading => Some(PseudoStage::Loading),
            HandleStatus::InitError => Some(PseudoStage::InitError),
            HandleStatus::Ready => None,
        }
    }
}

impl fmt::Display for HandleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleStatus::Loading => f.write_str("loading"),
            HandleStatus::InitError => f.write_str("init error"),
            HandleStatus::Ready => f.write_str("ready"),
        }
    }
}

pub(crate) enum InitState<P> {
    Loading,
    Failed,
    Ready {
        project: Arc<Mutex<P>>,
        actions: Arc<ActionRegistry<P>>,
    },
}

/// Values served to observers without touching the project.
pub(crate) struct Snapshot {
    pub(crate) name: String,
    pub(crate) current_stage: String,
    pub(crate) current_action: String,
    pub(crate) last_action_succeeded: bool,
}

pub(crate) struct Shared<P> {
    pub(crate) id: Uuid,
    pub(crate) init: watch::Sender<InitState<P>>,
    snapshot: std::sync::Mutex<Snapshot>,
}

impl<P> Shared<P> {
    pub(crate) fn snapshot(&self) -> MutexGuard<'_, Snapshot> {
        self.snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn status(&self) -> HandleStatus {
        match &*self.init.borrow() {
            InitState::Loading => HandleStatus::Loading,
            InitState::Failed => HandleStatus::InitError,
            InitState::Ready { .. } => HandleStatus::Ready,
        }
    }

    pub(crate) fn ready_parts(&self) -> Option<(Arc<Mutex<P>>, Arc<ActionRegistry<P>>)> {
        match &*self.init.borrow() {
            InitState::Ready { project, actions } => {
                Some((Arc::clone(project), Arc::clone(actions)))
            }
            _ => None,
        }
    }
}

/// Coordinates one project: its initialization, queue, cache and events.
pub struct ProjectHandle<P: Project> {
    shared: Arc<Shared<P>>,
    from_startup: bool,
    queue: ActionQueue,
    bus: NotificationBus,
    relay: LogRelay,
    logger: ProjectLogger,
    ready_tx: watch::Sender<bool>,
    disposed: AtomicBool,
    torn_down: AtomicBool,
}

impl<P: Project> ProjectHandle<P> {
    /// Create a handle and start constructing its project in the background.
    ///
    /// Returns immediately with the handle in `Loading`. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `factory` - Builds the underlying project
    /// * `args` - Construction arguments; the first one doubles as the
    ///   display name if construction fails
    /// * `settings` - Logging settings for this handle
    /// * `from_startup` - Provenance marker, only ever read back
    pub fn new<F>(factory: Arc<F>, args: ProjectArgs, settings: &Settings, from_startup: bool) -> Self
    where
        F: ProjectFactory<Project = P>,
    {
        let id = Uuid::new_v4();
        let bus = NotificationBus::new(id);
        let (ready_tx, _) = watch::channel(false);

        let gate = settings
            .buffer_logs_until_ready
            .then(|| ready_tx.subscribe());
        let relay = LogRelay::spawn(bus.clone(), gate);
        let logger = ProjectLogger::new(id, settings, relay.sender());

        let (init_tx, _) = watch::channel(InitState::Loading);
        let shared = Arc::new(Shared {
            id,
            init: init_tx,
            snapshot: std::sync::Mutex::new(Snapshot {
                name: LOADING_NAME.to_string(),
                current_stage: PseudoStage::Loading.to_string(),
                current_action: String::new(),
                last_action_succeeded: true,
            }),
        });

        let runner = HandleRunner::new(Arc::clone(&shared), bus.clone(), logger.clone());
        let queue = ActionQueue::new(Arc::new(runner));

        tokio::spawn(
            init::initialize(
                Arc::clone(&shared),
                factory,
                args,
                logger.clone(),
                bus.clone(),
                ready_tx.subscribe(),
            )
            .instrument(tracing::debug_span!("project_init", project_id = %id)),
        );

        Self {
            shared,
            from_startup,
            queue,
            bus,
            relay,
            logger,
            ready_tx,
            disposed: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
        }
    }

    /// Identifier carried by every event of this handle.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn from_startup(&self) -> bool {
        self.from_startup
    }

    pub fn status(&self) -> HandleStatus {
        self.shared.status()
    }

    /// Wait until construction has concluded and return the outcome.
    pub async fn wait_initialized(&self) -> HandleStatus {
        let mut init_rx = self.shared.init.subscribe();
        // The sender lives in `shared`, which we hold, so this cannot fail.
        let _ = init_rx
            .wait_for(|state| !matches!(state, InitState::Loading))
            .await;
        self.status()
    }

    /// Display name.
    ///
    /// `Loading...` while loading, the project's canonical name once ready,
    /// and the first construction argument (or `Undefined`) on init error.
    pub fn name(&self) -> String {
        self.shared.snapshot().name.clone()
    }

    /// Cached current stage or pseudo-stage name.
    ///
    /// Only refreshed by [`ProjectHandle::stage_map`].
    pub fn current_stage(&self) -> String {
        self.shared.snapshot().current_stage.clone()
    }

    /// Name of the action in flight, or an empty string.
    pub fn current_action(&self) -> String {
        self.shared.snapshot().current_action.clone()
    }

    pub fn last_action_succeeded(&self) -> bool {
        self.shared.snapshot().last_action_succeeded
    }

    /// Compute the project's stage map and refresh the cached current stage.
    ///
    /// Waits for any in-flight action to finish first.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::NotReady`] while `Loading` or in `InitError`.
    pub async fn stage_map(&self) -> HandleResult<StageMap> {
        let (project, _) = self
            .shared
            .ready_parts()
            .ok_or_else(|| HandleError::NotReady(self.status()))?;

        let state = project.lock().await.state();
        self.shared.snapshot().current_stage = state.current_stage().to_string();

        Ok(state.as_map())
    }

    /// The project's configuration, empty unless `Ready`.
    pub async fn config(&self) -> ProjectConfig {
        match self.shared.ready_parts() {
            Some((project, _)) => project.lock().await.config(),
            None => ProjectConfig::new(),
        }
    }

    /// Queue an action. Never blocks.
    ///
    /// Actions submitted while `Loading` are held until construction ends and
    /// dropped silently if it fails.
    ///
    /// # Errors
    ///
    /// - [`HandleError::Disposed`] once disposal has begun
    /// - [`HandleError::InitFailed`] if the project failed to initialize
    /// - [`HandleError::InvalidAction`] if the project is ready and does not
    ///   know the action or its arity
    pub fn submit_action(&self, name: impl Into<String>, args: Vec<Value>) -> HandleResult<()> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(HandleError::Disposed);
        }

        let action = Action::new(name, args);
        match &*self.shared.init.borrow() {
            InitState::Failed => return Err(HandleError::InitFailed),
            InitState::Ready { actions, .. } => actions.validate(&action)?,
            InitState::Loading => {}
        }

        tracing::trace!(project_id = %self.id(), action = %action.name, "action queued");
        self.queue.submit(action);
        Ok(())
    }

    /// Complete the readiness handshake. Idempotent.
    ///
    /// Releases the held-back initialization events and buffered log records.
    pub fn signal_ready(&self) {
        self.ready_tx.send_replace(true);
    }

    /// Dispatch a consumer operation.
    pub async fn apply(&self, op: Op) -> HandleResult<()> {
        match op {
            Op::SubmitAction { name, args } => self.submit_action(name, args),
            Op::SignalReady => {
                self.signal_ready();
                Ok(())
            }
            Op::Dispose => self.dispose().await,
        }
    }

    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) {
        self.bus.subscribe(subscriber);
    }

    /// Register a callback run synchronously on every event.
    ///
    /// The callback may query this handle; it sees `current_action` set
    /// while handling both `ActionStarted` and `ActionFinished`.
    pub fn subscribe_fn<F>(&self, callback: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bus.subscribe_fn(callback);
    }

    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<Event> {
        self.bus.subscribe_channel()
    }

    pub fn subscribe_stream(&self) -> UnboundedReceiverStream<Event> {
        self.bus.subscribe_stream()
    }

    /// The logger this handle and its project log through.
    pub fn logger(&self) -> &ProjectLogger {
        &self.logger
    }

    /// Number of actions queued but not started.
    pub fn pending_actions(&self) -> usize {
        self.queue.pending_len()
    }

    /// Tear the handle down.
    ///
    /// 1. Wait until no action is pending or in flight
    /// 2. Stop the log relay
    /// 3. Wait for the relay to drain
    /// 4. Log the disposal
    ///
    /// Submissions made after this starts are rejected. Both waits are
    /// unbounded.
    pub async fn dispose(&self) -> HandleResult<()> {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return Err(HandleError::AlreadyDisposed);
        }

        self.queue.wait_idle().await;
        self.relay.stop();
        self.relay.join().await;
        self.torn_down.store(true, Ordering::SeqCst);

        tracing::info!(project_id = %self.id(), "destroyed {}", self.name());
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl<P: Project> Drop for ProjectHandle<P> {
    fn drop(&mut self) {
        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }

        if !self.disposed.load(Ordering::SeqCst) {
            tracing::warn!(project_id = %self.id(), "handle for {} dropped without dispose", self.name());
        }

        let dropped = self.queue.clear();
        if dropped > 0 {
            tracing::debug!(project_id = %self.id(), dropped, "discarded pending actions on drop");
        }
        self.relay.stop();
    }
}

//! Per-project serialized action queue.
//!
//! An [`ActionQueue`] runs submitted actions one at a time, in submission
//! order, on a worker task. At most one worker exists per queue: `submit`
//! starts one only when none is active, and the worker exits once the
//! pending list is empty. Both decisions are taken under the same lock, so
//! the single-worker guarantee is structural rather than a counted limit.
//!
//! When an action fails, every action still pending is dropped before the
//! failure is reported. Actions submitted while the failure is being reported
//! are held back and queued once `finished` returns, so observers of the
//! failure always see an empty queue.

use async_trait::async_trait;
use futures::FutureExt;
use sk_protocol::action_models::{Action, ActionResult};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Executes actions on behalf of an [`ActionQueue`].
///
/// Callbacks are invoked from the worker task in this order for each action:
/// `started`, `invoke`, (flush on failure), `finished`.
#[async_trait]
pub trait ActionRunner: Send + Sync + 'static {
    /// Called each time a worker starts, before the first action.
    ///
    /// Returning `false` discards everything pending without invoking it.
    async fn prepare(&self) -> bool {
        true
    }

    fn started(&self, action: &Action);

    /// Run the action. Failures are reported through the result.
    async fn invoke(&self, action: &Action) -> ActionResult;

    /// Called after the pending list has been flushed if the action failed.
    fn finished(&self, action: &Action, result: ActionResult);
}

struct QueueState {
    pending: VecDeque<Action>,
    /// `Some` while a failure is being reported.
    held_back: Option<Vec<Action>>,
    worker_active: bool,
}

struct QueueInner {
    state: Mutex<QueueState>,
    idle_tx: watch::Sender<bool>,
    runner: Arc<dyn ActionRunner>,
    runtime: Handle,
}

impl QueueInner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// FIFO, single-worker action executor.
#[derive(Clone)]
pub struct ActionQueue {
    inner: Arc<QueueInner>,
}

impl ActionQueue {
    /// Create an idle queue.
    ///
    /// Must be called from within a Tokio runtime; workers are spawned on
    /// that runtime even when `submit` is called from a plain thread.
    pub fn new(runner: Arc<dyn ActionRunner>) -> Self {
        let (idle_tx, _) = watch::channel(true);

        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState {
                    pending: VecDeque::new(),
                    held_back: None,
                    worker_active: false,
                }),
                idle_tx,
                runner,
                runtime: Handle::current(),
            }),
        }
    }

    /// Append an action to the tail of the queue. Never blocks.
    pub fn submit(&self, action: Action) {
        let mut state = self.inner.lock();
        if let Some(held_back) = state.held_back.as_mut() {
            held_back.push(action);
            return;
        }
        state.pending.push_back(action);

        if !state.worker_active {
            state.worker_active = true;
            self.inner.idle_tx.send_replace(false);
            self.inner.runtime.spawn(run_worker(Arc::clone(&self.inner)));
        }
    }

    /// Number of actions waiting to start (the in-flight one excluded).
    ///
    /// Actions held back while a failure is being reported are not counted.
    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// No action pending and none in flight.
    pub fn is_idle(&self) -> bool {
        *self.inner.idle_tx.borrow()
    }

    /// Drop every pending action. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut state = self.inner.lock();
        let held_back = state.held_back.as_mut().map_or(0, |held| {
            let count = held.len();
            held.clear();
            count
        });
        let dropped = state.pending.len() + held_back;
        state.pending.clear();
        dropped
    }

    /// Wait until nothing is pending or in flight.
    ///
    /// There is no timeout: an action that never completes blocks this
    /// forever.
    pub async fn wait_idle(&self) {
        let mut idle_rx = self.inner.idle_tx.subscribe();
        // The sender lives in `inner`, which we hold, so this cannot fail.
        let _ = idle_rx.wait_for(|idle| *idle).await;
    }
}

async fn run_worker(inner: Arc<QueueInner>) {
    if !inner.runner.prepare().await {
        let mut state = inner.lock();
        let dropped = state.pending.len();
        state.pending.clear();
        state.worker_active = false;
        inner.idle_tx.send_replace(true);
        tracing::debug!(dropped, "action queue discarded pending actions");
        return;
    }

    loop {
        let action = {
            let mut state = inner.lock();
            match state.pending.pop_front() {
                Some(action) => action,
                None => {
                    state.worker_active = false;
                    inner.idle_tx.send_replace(true);
                    return;
                }
            }
        };

        run_hook("started", &action, || inner.runner.started(&action));

        let result = AssertUnwindSafe(inner.runner.invoke(&action))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                tracing::error!(action = %action.name, "action panicked");
                ActionResult::failure()
            });

        let failed = !result.succeeded;
        if failed {
            let mut state = inner.lock();
            let dropped = state.pending.len();
            state.pending.clear();
            state.held_back = Some(Vec::new());
            if dropped > 0 {
                tracing::debug!(action = %action.name, dropped, "flushed pending actions after failure");
            }
        }

        run_hook("finished", &action, || inner.runner.finished(&action, result));

        if failed {
            let mut state = inner.lock();
            if let Some(held_back) = state.held_back.take() {
                state.pending.extend(held_back);
            }
        }
    }
}

/// Run a synchronous runner hook, logging instead of unwinding on panic.
fn run_hook(hook: &str, action: &Action, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::error!(action = %action.name, hook, "action runner hook panicked");
    }
}

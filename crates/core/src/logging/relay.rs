//! Log relay task.
//!
//! Records are queued on an unbounded channel and forwarded to the bus by a
//! dedicated task. Forwarding can be held back by a gate (the consumer's
//! readiness signal) so that records produced before anyone listens are not
//! lost. Stopping the relay drains whatever is already queued.

use crate::bus::NotificationBus;
use sk_protocol::log_models::LogRecord;
use std::sync::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Forwards [`LogRecord`]s to a [`NotificationBus`] as `LogAdded` events.
pub struct LogRelay {
    tx: mpsc::UnboundedSender<LogRecord>,
    stop_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl LogRelay {
    /// Start the relay task.
    ///
    /// # Arguments
    ///
    /// * `bus` - Where records are delivered
    /// * `gate` - If set, nothing is forwarded until it turns `true`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(bus: NotificationBus, gate: Option<watch::Receiver<bool>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        let task = tokio::spawn(relay_loop(rx, stop_rx, gate, bus));

        Self {
            tx,
            stop_tx,
            task: Mutex::new(Some(task)),
        }
    }

    /// A sending end for producers such as [`crate::logging::ProjectLogger`].
    pub fn sender(&self) -> mpsc::UnboundedSender<LogRecord> {
        self.tx.clone()
    }

    /// Queue a record for forwarding.
    pub fn emit(&self, record: LogRecord) {
        let _ = self.tx.send(record);
    }

    /// Ask the relay to drain and exit. Does not wait.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Wait for the relay task to exit. Returns immediately if already joined.
    pub async fn join(&self) {
        let task = self
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!("log relay task ended abnormally: {e}");
            }
        }
    }
}

async fn relay_loop(
    mut rx: mpsc::UnboundedReceiver<LogRecord>,
    mut stop_rx: watch::Receiver<bool>,
    gate: Option<watch::Receiver<bool>>,
    bus: NotificationBus,
) {
    if let Some(mut gate) = gate {
        tokio::select! {
            // A dropped gate sender means nobody will ever open it; forward anyway.
            _ = gate.wait_for(|open| *open) => {}
            _ = stop_rx.wait_for(|stopped| *stopped) => {}
        }
    }

    loop {
        tokio::select! {
            biased;
            Some(record) = rx.recv() => bus.log_added(record),
            _ = stop_rx.wait_for(|stopped| *stopped) => break,
        }
    }

    while let Ok(record) = rx.try_recv() {
        bus.log_added(record);
    }
}

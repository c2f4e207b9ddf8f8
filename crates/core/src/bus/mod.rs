//! Per-handle notification bus.
//!
//! Events are delivered synchronously, in emission order, to every
//! subscriber registered at the time of emission. A subscriber that inspects
//! the handle while being notified sees the state the event describes.

use sk_protocol::ipc::Event;
use sk_protocol::log_models::LogRecord;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

/// Receives events from a [`NotificationBus`].
pub trait Subscriber: Send + Sync {
    /// Handle a single event. Called on the emitting task; keep it short.
    fn notify(&self, event: &Event);

    /// Closed subscribers are dropped on the next emission.
    fn is_closed(&self) -> bool {
        false
    }
}

impl Subscriber for mpsc::UnboundedSender<Event> {
    fn notify(&self, event: &Event) {
        let _ = self.send(event.clone());
    }

    fn is_closed(&self) -> bool {
        mpsc::UnboundedSender::is_closed(self)
    }
}

struct FnSubscriber<F>(F);

impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(&Event) + Send + Sync,
{
    fn notify(&self, event: &Event) {
        (self.0)(event);
    }
}

/// Push-style event delivery for a single project handle.
#[derive(Clone)]
pub struct NotificationBus {
    project_id: Uuid,
    subscribers: Arc<RwLock<Vec<Arc<dyn Subscriber>>>>,
}

impl NotificationBus {
    pub fn new(project_id: Uuid) -> Self {
        Self {
            project_id,
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// Register a subscriber. It only sees events emitted after this call.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) {
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(subscriber);
    }

    /// Register a callback invoked synchronously for every event.
    pub fn subscribe_fn<F>(&self, callback: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnSubscriber(callback)));
    }

    /// Register a channel subscriber and return its receiving end.
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe(Arc::new(tx));
        rx
    }

    /// Like [`NotificationBus::subscribe_channel`], as a `Stream`.
    pub fn subscribe_stream(&self) -> UnboundedReceiverStream<Event> {
        UnboundedReceiverStream::new(self.subscribe_channel())
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Deliver an event to every current subscriber, in registration order.
    pub fn emit(&self, event: Event) {
        // Snapshot so subscribers can subscribe or query without deadlocking.
        let subscribers: Vec<Arc<dyn Subscriber>> = {
            let mut guard = self
                .subscribers
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.retain(|subscriber| !subscriber.is_closed());
            guard.clone()
        };

        for subscriber in subscribers {
            // A panicking subscriber must not take the emitting task down with it.
            if catch_unwind(AssertUnwindSafe(|| subscriber.notify(&event))).is_err() {
                tracing::error!(project_id = %self.project_id, "subscriber panicked while handling {event:?}");
            }
        }
    }

    pub fn log_added(&self, record: LogRecord) {
        self.emit(Event::LogAdded {
            project_id: self.project_id,
            message: record.message,
            level: record.level,
        });
    }

    pub fn initialized(&self) {
        self.emit(Event::Initialized {
            project_id: self.project_id,
        });
    }

    pub fn name_changed(&self) {
        self.emit(Event::NameChanged {
            project_id: self.project_id,
        });
    }

    pub fn stage_changed(&self) {
        self.emit(Event::StageChanged {
            project_id: self.project_id,
        });
    }

    pub fn state_changed(&self) {
        self.emit(Event::StateChanged {
            project_id: self.project_id,
        });
    }

    pub fn action_started(&self, action: &str) {
        self.emit(Event::ActionStarted {
            project_id: self.project_id,
            action: action.to_string(),
        });
    }

    pub fn action_finished(&self, action: &str, success: bool) {
        self.emit(Event::ActionFinished {
            project_id: self.project_id,
            action: action.to_string(),
            success,
        });
    }
}

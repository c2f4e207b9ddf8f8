//! Test fixtures for creating handles and collecting their events.

use crate::common::mock_projects::{ScriptedFactory, ScriptedProject};
use sk_core::handle::{HandleStatus, ProjectHandle};
use sk_core::project::ProjectArgs;
use sk_protocol::config_models::Settings;
use sk_protocol::ipc::Event;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub type ScriptedHandle = ProjectHandle<ScriptedProject>;

/// Upper bound for any single wait in these tests.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a handle over a scripted factory at `path`.
///
/// Returns the factory too so tests can inspect invocations.
pub fn create_handle(
    factory: ScriptedFactory,
    args: ProjectArgs,
) -> (Arc<ScriptedFactory>, Arc<ScriptedHandle>) {
    let factory = Arc::new(factory);
    let handle = ProjectHandle::new(Arc::clone(&factory), args, &Settings::default(), false);
    (factory, Arc::new(handle))
}

/// Create a handle at `/projects/blink` over an always-succeeding factory.
#[allow(dead_code)]
pub fn create_succeeding_handle() -> (Arc<ScriptedFactory>, Arc<ScriptedHandle>) {
    create_handle(ScriptedFactory::succeeding(), ProjectArgs::path("/projects/blink"))
}

/// Poll until the handle leaves `Loading`.
#[allow(dead_code)]
pub async fn wait_until_initialized(handle: &ScriptedHandle) -> HandleStatus {
    tokio::time::timeout(TEST_TIMEOUT, async {
        loop {
            let status = handle.status();
            if status != HandleStatus::Loading {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("handle did not finish initializing")
}

/// Receive events until `is_last` matches one (inclusive) or the timeout hits.
#[allow(dead_code)]
pub async fn collect_until<F>(rx: &mut mpsc::UnboundedReceiver<Event>, is_last: F) -> Vec<Event>
where
    F: Fn(&Event) -> bool,
{
    let mut events = Vec::new();
    let _ = tokio::time::timeout(TEST_TIMEOUT, async {
        while let Some(event) = rx.recv().await {
            let done = is_last(&event);
            events.push(event);
            if done {
                break;
            }
        }
    })
    .await;
    events
}

/// Receive until the `n`-th `ActionFinished` event.
#[allow(dead_code)]
pub async fn collect_finished(rx: &mut mpsc::UnboundedReceiver<Event>, n: usize) -> Vec<Event> {
    let mut events = Vec::new();
    let mut finished = 0;
    let _ = tokio::time::timeout(TEST_TIMEOUT, async {
        while let Some(event) = rx.recv().await {
            if matches!(event, Event::ActionFinished { .. }) {
                finished += 1;
            }
            events.push(event);
            if finished == n {
                break;
            }
        }
    })
    .await;
    events
}

/// Everything already delivered to the channel, without waiting.
#[allow(dead_code)]
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

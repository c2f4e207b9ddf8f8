//! Integration tests for handle teardown.
//!
//! Disposal must:
//! - Wait for every accepted action to finish
//! - Reject submissions once it has begun
//! - Stop log relaying
//! - Work whether or not the project initialized

mod common;

use common::*;
use sk_core::handle::{HandleError, HandleStatus};
use sk_core::project::ProjectArgs;
use sk_protocol::ipc::Event;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_dispose_waits_for_queued_actions() {
    let (factory, handle) = create_handle(
        ScriptedFactory::succeeding().with_action_delay(Duration::from_millis(20)),
        ProjectArgs::path("/projects/blink"),
    );
    let mut rx = handle.subscribe_channel();
    wait_until_initialized(&handle).await;

    for action in ["generate", "init_toolchain", "patch", "build"] {
        handle.submit_action(action, Vec::new()).unwrap();
    }
    handle.dispose().await.unwrap();

    let events = drain(&mut rx);
    assert_eq!(count_action_started(&events), 4);
    assert_eq!(count_action_finished(&events), 4);
    assert_eq!(factory.invocations().len(), 4);
    assert_eq!(handle.pending_actions(), 0);
    assert_eq!(handle.current_action(), "");
}

#[tokio::test]
async fn test_dispose_waits_for_actions_queued_while_loading() {
    let (factory, handle) = create_handle(
        ScriptedFactory::succeeding().with_construct_delay(Duration::from_millis(50)),
        ProjectArgs::path("/projects/blink"),
    );

    handle.submit_action("generate", Vec::new()).unwrap();
    handle.submit_action("build", Vec::new()).unwrap();
    handle.dispose().await.unwrap();

    assert_eq!(factory.invocations(), vec!["generate".to_string(), "build".to_string()]);
}

#[tokio::test]
async fn test_submit_after_dispose_is_rejected() {
    let (factory, handle) = create_succeeding_handle();
    wait_until_initialized(&handle).await;

    handle.dispose().await.unwrap();

    assert_eq!(
        handle.submit_action("build", Vec::new()),
        Err(HandleError::Disposed)
    );
    assert!(factory.invocations().is_empty());
    assert!(handle.is_disposed());
}

#[tokio::test]
async fn test_submit_during_dispose_is_rejected() {
    let (_factory, handle) = create_handle(
        ScriptedFactory::succeeding().with_action_delay(Duration::from_millis(100)),
        ProjectArgs::path("/projects/blink"),
    );
    wait_until_initialized(&handle).await;
    handle.submit_action("build", Vec::new()).unwrap();

    let disposing = Arc::clone(&handle);
    let dispose = tokio::spawn(async move { disposing.dispose().await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(handle.is_disposed());
    assert_eq!(
        handle.submit_action("clean", Vec::new()),
        Err(HandleError::Disposed)
    );

    dispose.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_double_dispose() {
    let (_factory, handle) = create_succeeding_handle();

    handle.dispose().await.unwrap();
    assert_eq!(handle.dispose().await, Err(HandleError::AlreadyDisposed));
}

#[tokio::test]
async fn test_dispose_after_initialization_failure() {
    let (_factory, handle) = create_handle(
        ScriptedFactory::failing_construction("toolchain missing"),
        ProjectArgs::path("/projects/broken"),
    );
    wait_until_initialized(&handle).await;

    handle.dispose().await.unwrap();

    assert_eq!(handle.status(), HandleStatus::InitError);
    assert!(handle.is_disposed());
}

#[tokio::test]
async fn test_dispose_while_loading() {
    let (factory, handle) = create_handle(
        ScriptedFactory::succeeding().with_construct_delay(Duration::from_millis(200)),
        ProjectArgs::path("/projects/blink"),
    );

    tokio::time::timeout(TEST_TIMEOUT, handle.dispose())
        .await
        .expect("dispose should not wait for construction")
        .unwrap();

    assert!(factory.invocations().is_empty());
}

#[tokio::test]
async fn test_logs_stop_after_dispose() {
    let (_factory, handle) = create_succeeding_handle();
    let mut rx = handle.subscribe_channel();
    handle.signal_ready();
    wait_until_initialized(&handle).await;

    handle.logger().info("before dispose");
    handle.dispose().await.unwrap();
    let before = log_messages(&drain(&mut rx));
    assert!(before.iter().any(|m| m == "before dispose"));

    handle.logger().info("after dispose");
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(log_messages(&drain(&mut rx)).is_empty());
}

#[tokio::test]
async fn test_buffered_logs_are_flushed_on_dispose() {
    let (_factory, handle) = create_succeeding_handle();
    let mut rx = handle.subscribe_channel();
    wait_until_initialized(&handle).await;

    handle.logger().warning("never acknowledged");
    handle.dispose().await.unwrap();

    let messages = log_messages(&drain(&mut rx));
    assert!(messages.iter().any(|m| m == "never acknowledged"));
}

#[tokio::test]
async fn test_drop_without_dispose_discards_pending_actions() {
    let (factory, handle) = create_handle(
        ScriptedFactory::succeeding().with_construct_delay(Duration::from_millis(50)),
        ProjectArgs::path("/projects/blink"),
    );
    handle.submit_action("generate", Vec::new()).unwrap();
    handle.submit_action("build", Vec::new()).unwrap();

    drop(handle);
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(factory.invocations().is_empty());
}

#[tokio::test]
async fn test_dispose_completes_when_project_name_panics() {
    let (factory, handle) = create_handle(
        ScriptedFactory::succeeding()
            .panicking_in("name")
            .with_construct_delay(Duration::from_millis(20)),
        ProjectArgs::path("/projects/blink"),
    );
    handle.submit_action("generate", Vec::new()).unwrap();

    let status = tokio::time::timeout(TEST_TIMEOUT, handle.wait_initialized())
        .await
        .expect("handle stuck in Loading");
    assert_eq!(status, HandleStatus::InitError);
    assert_eq!(handle.name(), "/projects/blink");
    assert_eq!(handle.current_stage(), "INIT_ERROR");

    tokio::time::timeout(TEST_TIMEOUT, handle.dispose())
        .await
        .expect("dispose hung")
        .unwrap();
    assert!(factory.invocations().is_empty());
}

#[tokio::test]
async fn test_initialization_does_not_scan_stages() {
    let (factory, handle) = create_handle(
        ScriptedFactory::succeeding().panicking_in("state"),
        ProjectArgs::path("/projects/blink"),
    );

    let status = tokio::time::timeout(TEST_TIMEOUT, handle.wait_initialized())
        .await
        .expect("handle stuck in Loading");
    assert_eq!(status, HandleStatus::Ready);
    assert_eq!(handle.name(), "blink");
    assert_eq!(handle.current_stage(), "INITIALIZED");

    handle.submit_action("build", Vec::new()).unwrap();
    tokio::time::timeout(TEST_TIMEOUT, handle.dispose())
        .await
        .expect("dispose hung")
        .unwrap();
    assert_eq!(factory.invocations(), vec!["build"]);
}

#[tokio::test]
async fn test_dispose_completes_after_subscriber_panics() {
    let (factory, handle) = create_succeeding_handle();
    handle.subscribe_fn(|event| {
        if let Event::ActionStarted { action, .. } = event {
            if action == "generate" {
                panic!("subscriber gave up on {action}");
            }
        }
    });
    let mut rx = handle.subscribe_channel();
    handle.signal_ready();
    wait_until_initialized(&handle).await;

    handle.submit_action("generate", Vec::new()).unwrap();
    handle.submit_action("build", Vec::new()).unwrap();
    tokio::time::timeout(TEST_TIMEOUT, handle.dispose())
        .await
        .expect("dispose hung")
        .unwrap();

    assert_eq!(factory.invocations(), vec!["generate", "build"]);
    let events = drain(&mut rx);
    assert_eq!(count_action_finished(&events), 2);
    assert!(handle.last_action_succeeded());
}

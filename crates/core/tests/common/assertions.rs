//! Custom assertion helpers for integration tests.

use sk_protocol::ipc::Event;

/// Action events rendered as `started:<name>` / `finished:<name>:<success>`.
pub fn action_trace(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::ActionStarted { action, .. } => Some(format!("started:{action}")),
            Event::ActionFinished {
                action, success, ..
            } => Some(format!("finished:{action}:{success}")),
            _ => None,
        })
        .collect()
}

/// Lifecycle events (everything but logs and actions) as their variant names.
pub fn lifecycle_trace(events: &[Event]) -> Vec<&'static str> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Initialized { .. } => Some("initialized"),
            Event::NameChanged { .. } => Some("nameChanged"),
            Event::StageChanged { .. } => Some("stageChanged"),
            Event::StateChanged { .. } => Some("stateChanged"),
            _ => None,
        })
        .collect()
}

pub fn count_initialized(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::Initialized { .. }))
        .count()
}

pub fn count_action_started(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::ActionStarted { .. }))
        .count()
}

pub fn count_action_finished(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::ActionFinished { .. }))
        .count()
}

/// Log messages relayed through `LogAdded`.
pub fn log_messages(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::LogAdded { message, .. } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

/// Assert that a string contains a substring (case-insensitive).
pub fn assert_contains_ci(haystack: &str, needle: &str) {
    let haystack_lower = haystack.to_lowercase();
    let needle_lower = needle.to_lowercase();
    assert!(
        haystack_lower.contains(&needle_lower),
        "Expected '{haystack}' to contain '{needle}' (case-insensitive)"
    );
}

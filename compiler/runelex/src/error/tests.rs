use super::*;
use pretty_assertions::assert_eq;

#[test]
fn fatal_message_is_verbatim() {
    let err = ScanError::fatal("expected '='");
    assert_eq!(err.message(), "expected '='");
    assert_eq!(err.to_string(), "scan aborted: expected '='");
}

#[test]
fn other_messages_use_display() {
    assert_eq!(ScanError::Cancelled.message(), "scan cancelled");
    let err = ScanError::TimedOut {
        after: Duration::from_millis(250),
    };
    assert_eq!(err.message(), "scan timed out after 250ms");
}

#[test]
fn spawn_error_keeps_source() {
    let err = ScanError::Spawn(std::io::Error::other("no threads"));
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("no threads"));
}

#[test]
fn slot_starts_empty() {
    let slot = ErrorSlot::default();
    assert_eq!(slot.get(), None);
}

#[test]
fn slot_keeps_last_message_across_clones() {
    let slot = ErrorSlot::default();
    let consumer_side = slot.clone();
    slot.record("first");
    slot.record("second");
    assert_eq!(consumer_side.get().as_deref(), Some("second"));
}

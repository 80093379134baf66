use chrono::Utc;
use latchkey_engine::EngineError;
use latchkey_store::StoreError;
use latchkey_types::{Binding, DeviceId, KeyCode};

fn binding() -> Binding {
    Binding::new(DeviceId::new("d1"), Utc::now(), 30)
}

#[test]
fn error_display_not_found() {
    let err = EngineError::NotFound(KeyCode::parse("LK-TEST-AAAAA").unwrap());
    let msg = format!("{err}");
    assert!(msg.contains("unknown activation code"));
    assert!(msg.contains("LK-TEST-AAAAA"));
}

#[test]
fn error_display_conflict() {
    let err = EngineError::Conflict;
    assert!(format!("{err}").contains("another device"));
}

#[test]
fn error_display_already_used() {
    let err = EngineError::AlreadyUsed { binding: binding() };
    assert!(format!("{err}").contains("already in use"));
}

#[test]
fn already_used_carries_the_binding() {
    let err = EngineError::AlreadyUsed { binding: binding() };
    match err {
        EngineError::AlreadyUsed { binding } => {
            assert_eq!(binding.device_id, DeviceId::new("d1"));
        }
        other => panic!("expected AlreadyUsed, got {other:?}"),
    }
}

#[test]
fn error_display_not_activated() {
    let err = EngineError::NotActivated;
    assert!(format!("{err}").contains("no activation"));
}

#[test]
fn error_display_state() {
    let err = EngineError::State("disk full".into());
    let msg = format!("{err}");
    assert!(msg.contains("activation state"));
    assert!(msg.contains("disk full"));
}

#[test]
fn store_errors_convert() {
    let err: EngineError = StoreError::Unavailable("connection refused".into()).into();
    assert!(format!("{err}").contains("store unavailable"));
    assert!(format!("{err}").contains("connection refused"));
}

//! Tests for the clock watermark and local state persistence.

use chrono::{Duration, TimeZone, Utc};
use latchkey_engine::{ClockWatermark, EngineState, StateFile};
use latchkey_types::KeyCode;

// ── ClockWatermark ────────────────────────────────────────────────

#[test]
fn fresh_watermark_has_no_value() {
    let watermark = ClockWatermark::default();
    assert!(watermark.last().is_none());
}

#[test]
fn observe_returns_prior_and_advances() {
    let t1 = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    let t2 = t1 + Duration::hours(1);

    let mut watermark = ClockWatermark::default();
    assert_eq!(watermark.observe(t1), None);
    assert_eq!(watermark.last(), Some(t1));
    assert_eq!(watermark.observe(t2), Some(t1));
    assert_eq!(watermark.last(), Some(t2));
}

#[test]
fn observe_never_regresses() {
    let t1 = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    let earlier = t1 - Duration::minutes(5);

    let mut watermark = ClockWatermark::default();
    watermark.observe(t1);
    // A backward reading is reported as the prior value but does not move
    // the watermark down.
    assert_eq!(watermark.observe(earlier), Some(t1));
    assert_eq!(watermark.last(), Some(t1));
}

// ── StateFile ─────────────────────────────────────────────────────

#[test]
fn missing_file_loads_default_state() {
    let dir = tempfile::tempdir().unwrap();
    let file = StateFile::new(dir.path());
    let state = file.load().unwrap();
    assert!(state.code.is_none());
    assert!(state.watermark.last().is_none());
    assert!(!state.tampered);
}

#[test]
fn state_roundtrips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let file = StateFile::new(dir.path());

    let mut state = EngineState {
        code: Some(KeyCode::parse("LK-TEST-AAAAA").unwrap()),
        ..EngineState::default()
    };
    state
        .watermark
        .observe(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap());
    state.tampered = true;

    file.save(&state).unwrap();
    let loaded = file.load().unwrap();

    assert_eq!(loaded.code, state.code);
    assert_eq!(loaded.watermark.last(), state.watermark.last());
    assert!(loaded.tampered);
}

#[test]
fn save_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let file = StateFile::new(&nested);
    file.save(&EngineState::default()).unwrap();
    assert!(file.path().exists());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = StateFile::new(dir.path());
    std::fs::write(file.path(), "not json").unwrap();
    assert!(file.load().is_err());
}

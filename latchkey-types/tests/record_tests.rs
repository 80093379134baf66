use chrono::{Duration, Utc};
use latchkey_types::{Binding, ClientInfo, DeviceId, KeyCode, KeyDraft, KeyRecord, KeyStatus};
use pretty_assertions::assert_eq;

fn draft() -> KeyDraft {
    KeyDraft {
        client: ClientInfo::named("Acme Corp"),
        duration_days: 30,
    }
}

fn issued_record() -> KeyRecord {
    let code = KeyCode::parse("LK-TEST01-AAAAA").unwrap();
    KeyRecord::issued(code, draft(), Utc::now())
}

// ── Issuance ──────────────────────────────────────────────────────

#[test]
fn issued_record_is_unused_with_no_binding() {
    let record = issued_record();
    assert_eq!(record.status, KeyStatus::Unused);
    assert!(record.binding.is_none());
    assert!(record.is_unused());
}

#[test]
fn issued_record_keeps_draft_fields() {
    let record = issued_record();
    assert_eq!(record.client.name, "Acme Corp");
    assert_eq!(record.duration_days, 30);
}

// ── Binding ───────────────────────────────────────────────────────

#[test]
fn binding_expiry_is_activation_plus_duration() {
    let t0 = Utc::now();
    let binding = Binding::new(DeviceId::new("d1"), t0, 30);
    assert_eq!(binding.expires_at, t0 + Duration::days(30));
}

#[test]
fn with_binding_sets_activated() {
    let t0 = Utc::now();
    let record = issued_record().with_binding(Binding::new(DeviceId::new("d1"), t0, 30));
    assert_eq!(record.status, KeyStatus::Activated);
    assert_eq!(record.bound_device(), Some(&DeviceId::new("d1")));
    assert!(!record.is_unused());
}

#[test]
fn released_record_returns_to_unused() {
    let t0 = Utc::now();
    let bound = issued_record().with_binding(Binding::new(DeviceId::new("d1"), t0, 30));
    let released = bound.clone().released();
    assert!(released.is_unused());
    assert_eq!(released.code, bound.code);
    assert_eq!(released.duration_days, bound.duration_days);
    assert_eq!(released.created_at, bound.created_at);
    assert_eq!(released.client, bound.client);
}

// ── Expiry derivation ─────────────────────────────────────────────

#[test]
fn unused_record_never_expires() {
    let record = issued_record();
    assert!(!record.is_expired_at(Utc::now() + Duration::days(400)));
}

#[test]
fn expiry_is_derived_from_clock() {
    let t0 = Utc::now();
    let record = issued_record().with_binding(Binding::new(DeviceId::new("d1"), t0, 30));

    assert!(!record.is_expired_at(t0 + Duration::days(29)));
    assert!(record.is_expired_at(t0 + Duration::days(31)));
}

#[test]
fn display_status_reflects_expiry_without_mutation() {
    let t0 = Utc::now();
    let record = issued_record().with_binding(Binding::new(DeviceId::new("d1"), t0, 30));

    assert_eq!(record.display_status(t0 + Duration::days(1)), KeyStatus::Activated);
    assert_eq!(record.display_status(t0 + Duration::days(31)), KeyStatus::Expired);
    // The persisted status is untouched by display derivation.
    assert_eq!(record.status, KeyStatus::Activated);
}

#[test]
fn expired_record_can_still_be_released() {
    let t0 = Utc::now() - Duration::days(60);
    let record = issued_record().with_binding(Binding::new(DeviceId::new("d1"), t0, 30));
    assert!(record.is_expired_at(Utc::now()));

    let released = record.released();
    assert!(released.is_unused());
    assert_eq!(released.display_status(Utc::now()), KeyStatus::Unused);
}

// ── Serde ─────────────────────────────────────────────────────────

#[test]
fn record_serde_roundtrip() {
    let t0 = Utc::now();
    let record = issued_record().with_binding(Binding::new(DeviceId::new("d1"), t0, 30));
    let json = serde_json::to_string(&record).unwrap();
    let back: KeyRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn status_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&KeyStatus::Unused).unwrap(), "\"unused\"");
    assert_eq!(serde_json::to_string(&KeyStatus::Activated).unwrap(), "\"activated\"");
    assert_eq!(serde_json::to_string(&KeyStatus::Expired).unwrap(), "\"expired\"");
    assert_eq!(serde_json::to_string(&KeyStatus::Tampered).unwrap(), "\"tampered\"");
}

#[test]
fn record_without_binding_field_deserializes() {
    // Records written before activation carry no binding key at all.
    let json = r#"{
        "code": "LK-TEST01-AAAAA",
        "client": {"name": "Acme Corp"},
        "duration_days": 30,
        "status": "unused",
        "created_at": "2026-01-15T12:00:00Z"
    }"#;
    let record: KeyRecord = serde_json::from_str(json).unwrap();
    assert!(record.is_unused());
    assert!(record.client.phone.is_none());
}

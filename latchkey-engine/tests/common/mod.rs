//! Shared test helpers for engine tests.

#![allow(dead_code)]

use latchkey_engine::{ActivationEngine, EngineConfig};
use latchkey_store::{KeyStore, MemoryStore};
use latchkey_types::{ClientInfo, DeviceId, KeyCode, KeyDraft, KeyRecord};
use std::path::Path;
use std::sync::Arc;

/// Initializes test logging once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

pub fn code(s: &str) -> KeyCode {
    KeyCode::parse(s).unwrap()
}

pub fn draft(duration_days: u32) -> KeyDraft {
    KeyDraft {
        client: ClientInfo::named("Acme Corp"),
        duration_days,
    }
}

/// A store pre-seeded with one unused 30-day key under `LK-TEST-AAAAA`.
pub async fn seeded_store() -> (Arc<MemoryStore>, KeyRecord) {
    let store = Arc::new(MemoryStore::new());
    let record = store
        .create(code("LK-TEST-AAAAA"), draft(30))
        .await
        .unwrap();
    (store, record)
}

/// An engine for `device` with its state under `dir`.
pub fn engine_in(
    store: &Arc<MemoryStore>,
    device: &str,
    dir: &Path,
) -> ActivationEngine<MemoryStore> {
    ActivationEngine::new(
        Arc::clone(store),
        DeviceId::new(device),
        EngineConfig::with_state_dir(dir),
    )
    .unwrap()
}

//! In-process reference implementation of the store contract.
//!
//! Backed by a `HashMap` behind a single async `RwLock`, with broadcast
//! channels for change notification. Every mutation happens under the
//! write lock, which is what makes `bind` an atomic compare-and-swap.
//!
//! Used by tests and local development; a production deployment points
//! the same trait at the hosted store.

use crate::error::{StoreError, StoreResult};
use crate::watch::{KeyEvent, KeyWatch};
use crate::KeyStore;
use async_trait::async_trait;
use chrono::Utc;
use latchkey_types::{Binding, KeyCode, KeyDraft, KeyRecord};
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Capacity of each notification channel. Slow consumers skip overwritten
/// events rather than blocking writers.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct Shared {
    records: HashMap<KeyCode, KeyRecord>,
    topics: HashMap<KeyCode, broadcast::Sender<KeyEvent>>,
    all: Option<broadcast::Sender<KeyEvent>>,
}

impl Shared {
    fn notify(&self, event: KeyEvent) {
        if let Some(tx) = self.topics.get(event.code()) {
            let _ = tx.send(event.clone());
        }
        if let Some(tx) = &self.all {
            let _ = tx.send(event);
        }
    }
}

/// An in-memory key record store.
#[derive(Default)]
pub struct MemoryStore {
    shared: RwLock<Shared>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyStore for MemoryStore {
    async fn get(&self, code: &KeyCode) -> StoreResult<Option<KeyRecord>> {
        let shared = self.shared.read().await;
        Ok(shared.records.get(code).cloned())
    }

    async fn create(&self, code: KeyCode, draft: KeyDraft) -> StoreResult<KeyRecord> {
        let mut shared = self.shared.write().await;
        // created_at is this store's clock, standing in for server time.
        let record = KeyRecord::issued(code.clone(), draft, Utc::now());
        shared.records.insert(code.clone(), record.clone());
        shared.notify(KeyEvent::Updated(record.clone()));
        debug!(code = %code, "created key record");
        Ok(record)
    }

    async fn bind(&self, code: &KeyCode, binding: Binding) -> StoreResult<KeyRecord> {
        let mut shared = self.shared.write().await;
        let current = shared
            .records
            .get(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        if !current.is_unused() {
            return Err(StoreError::Conflict {
                current: Box::new(current.clone()),
            });
        }
        let updated = current.clone().with_binding(binding);
        shared.records.insert(code.clone(), updated.clone());
        shared.notify(KeyEvent::Updated(updated.clone()));
        debug!(code = %code, "bound key record");
        Ok(updated)
    }

    async fn release(&self, code: &KeyCode) -> StoreResult<KeyRecord> {
        let mut shared = self.shared.write().await;
        let current = shared
            .records
            .get(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        let released = current.clone().released();
        shared.records.insert(code.clone(), released.clone());
        shared.notify(KeyEvent::Updated(released.clone()));
        debug!(code = %code, "released key record");
        Ok(released)
    }

    async fn remove(&self, code: &KeyCode) -> StoreResult<()> {
        let mut shared = self.shared.write().await;
        if shared.records.remove(code).is_some() {
            shared.notify(KeyEvent::Removed(code.clone()));
            debug!(code = %code, "removed key record");
        }
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<KeyRecord>> {
        let shared = self.shared.read().await;
        Ok(shared.records.values().cloned().collect())
    }

    async fn watch(&self, code: &KeyCode) -> KeyWatch {
        let mut shared = self.shared.write().await;
        let tx = shared
            .topics
            .entry(code.clone())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        KeyWatch::new(tx.subscribe())
    }

    async fn watch_all(&self) -> KeyWatch {
        let mut shared = self.shared.write().await;
        let tx = shared
            .all
            .get_or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        KeyWatch::new(tx.subscribe())
    }
}

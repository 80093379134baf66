//! Push-based change notification for key records.
//!
//! The store delivers updates on a single logical stream per code.
//! Delivery is at-least-once: consumers must treat duplicate or
//! re-ordered events idempotently (re-applying the same record is a
//! no-op).

use latchkey_types::{KeyCode, KeyRecord};
use tokio::sync::broadcast;
use tracing::warn;

/// A change to a key record, as observed by a subscriber.
#[derive(Debug, Clone)]
pub enum KeyEvent {
    /// The record was written (issued, activated, or reset).
    Updated(KeyRecord),
    /// The record was deleted from the store.
    Removed(KeyCode),
}

impl KeyEvent {
    /// The code this event concerns.
    #[must_use]
    pub fn code(&self) -> &KeyCode {
        match self {
            Self::Updated(record) => &record.code,
            Self::Removed(code) => code,
        }
    }
}

/// A live subscription to key record changes.
///
/// Dropping the watch unsubscribes; there is no registry to clean up.
pub struct KeyWatch {
    rx: broadcast::Receiver<KeyEvent>,
}

impl KeyWatch {
    /// Wraps the receiving half of a store's notification channel. Store
    /// implementations call this; consumers only ever [`recv`](Self::recv).
    #[must_use]
    pub fn new(rx: broadcast::Receiver<KeyEvent>) -> Self {
        Self { rx }
    }

    /// Waits for the next change event.
    ///
    /// Returns `None` once the store has been dropped and no further
    /// events can arrive. A slow consumer that falls behind the channel
    /// capacity skips the overwritten events and keeps receiving; skipped
    /// events are safe to miss because every `Updated` carries the full
    /// record, not a delta.
    pub async fn recv(&mut self) -> Option<KeyEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "key watch lagged, skipping stale events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

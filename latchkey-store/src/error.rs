//! Error types for store operations.

use latchkey_types::{KeyCode, KeyRecord};
use thiserror::Error;

/// Errors surfaced by a key record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists for the requested code.
    #[error("no record for code {0}")]
    NotFound(KeyCode),

    /// A conditional write lost its race: the record was no longer unused.
    /// Carries the record that won so the caller can inspect the binding.
    #[error("conditional write rejected: record is no longer unused")]
    Conflict {
        /// The record as it stood when the write was rejected.
        current: Box<KeyRecord>,
    },

    /// The hosted store could not be reached. Carries no state-mutation
    /// risk, so callers may retry with backoff.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

//! Error types for the activation engine.
//!
//! Tamper and expiry are deliberately NOT here: they are expected,
//! first-class [`Verdict`](crate::Verdict) outcomes the application shell
//! must render, not failures of the engine.

use latchkey_store::StoreError;
use latchkey_types::{Binding, KeyCode};
use thiserror::Error;

/// Errors surfaced to the protected application shell.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No record exists for the entered code. Surfaced as "invalid code".
    #[error("unknown activation code {0}")]
    NotFound(KeyCode),

    /// Lost the activation race to another device. Never retried
    /// automatically — a retry would rebind the key to the wrong device.
    #[error("code was activated by another device first")]
    Conflict,

    /// The key is already bound. Carries the existing binding so the
    /// caller can treat re-entry from the same device as success and a
    /// foreign device as rejection.
    #[error("code is already in use by another device")]
    AlreadyUsed {
        /// The binding that already exists.
        binding: Binding,
    },

    /// No activation has been performed on this device yet.
    #[error("no activation on this device")]
    NotActivated,

    /// The device-local activation state could not be read or written.
    #[error("activation state error: {0}")]
    State(String),

    /// The shared store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

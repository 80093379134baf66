//! Shared data contract for the Latchkey activation system.
//!
//! This crate defines the types shared between the issuing authority (the
//! admin console) and the consuming client (the protected application):
//! - Activation code and device identifiers
//! - The activation key record and its status
//! - The device binding created on first activation
//!
//! Gating logic (verdicts, clock handling) lives in `latchkey-engine`;
//! store access lives in `latchkey-store`. Nothing here performs I/O.

mod ids;
mod record;

pub use ids::{DeviceId, KeyCode};
pub use record::{Binding, ClientInfo, KeyDraft, KeyRecord, KeyStatus};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid activation code: {0}")]
    InvalidCode(String),
}

//! Error types for issuance operations.

use latchkey_store::StoreError;
use latchkey_types::KeyCode;
use thiserror::Error;

/// Errors surfaced to the admin console.
#[derive(Debug, Error)]
pub enum IssuerError {
    /// Bad input to issuance (e.g. a zero duration). Recoverable locally:
    /// re-prompt the operator.
    #[error("invalid issuance request: {0}")]
    Validation(String),

    /// The code does not exist in the store.
    #[error("unknown activation code {0}")]
    NotFound(KeyCode),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for issuance operations.
pub type IssuerResult<T> = Result<T, IssuerError>;

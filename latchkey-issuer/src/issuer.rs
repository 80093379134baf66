//! The key issuer: creates, resets, and deletes activation key records.
//!
//! Runs inside the admin console. Privilege is an external concern — the
//! console decides who may call these operations; the issuer just performs
//! them against the shared store.

use crate::codegen;
use crate::error::{IssuerError, IssuerResult};
use latchkey_store::{KeyStore, KeyWatch, StoreError};
use latchkey_types::{ClientInfo, KeyCode, KeyDraft, KeyRecord};
use std::sync::Arc;
use tracing::info;

/// Issues and administers activation keys against a shared store.
pub struct KeyIssuer<S> {
    store: Arc<S>,
}

impl<S: KeyStore> KeyIssuer<S> {
    /// Creates an issuer over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Issues a new activation key: generates a code and writes an unused
    /// record. `created_at` is assigned by the store's clock.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Validation`] if `duration_days` is zero.
    pub async fn issue(&self, client: ClientInfo, duration_days: u32) -> IssuerResult<KeyRecord> {
        if duration_days == 0 {
            return Err(IssuerError::Validation(
                "duration must be a positive number of days".to_string(),
            ));
        }

        let code = codegen::generate();
        let draft = KeyDraft {
            client,
            duration_days,
        };
        let record = self.store.create(code, draft).await?;
        info!(code = %record.code, duration_days, "issued activation key");
        Ok(record)
    }

    /// Returns a key to the unused state, discarding its device binding.
    ///
    /// Works from any prior status, including expired: expiry is derived
    /// from the clock, never persisted, so there is no one-way transition
    /// to undo. Applying reset twice leaves the record identical.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::NotFound`] for unknown codes.
    pub async fn reset(&self, code: &KeyCode) -> IssuerResult<KeyRecord> {
        match self.store.release(code).await {
            Ok(record) => {
                info!(code = %code, "reset activation key");
                Ok(record)
            }
            Err(StoreError::NotFound(code)) => Err(IssuerError::NotFound(code)),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a key record permanently. Idempotent: deleting an unknown
    /// code is not an error.
    pub async fn delete(&self, code: &KeyCode) -> IssuerResult<()> {
        self.store.remove(code).await?;
        info!(code = %code, "deleted activation key");
        Ok(())
    }

    /// Returns the full current set of records, for display and filtering.
    pub async fn list_all(&self) -> IssuerResult<Vec<KeyRecord>> {
        Ok(self.store.list().await?)
    }

    /// Subscribes to changes across all records, so the admin listing can
    /// stay live without polling.
    pub async fn watch_all(&self) -> KeyWatch {
        self.store.watch_all().await
    }
}

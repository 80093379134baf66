//! Key record store contract for Latchkey.
//!
//! The issuing authority (admin console) and the consuming client (the
//! protected application) are independent processes sharing one hosted
//! record store, keyed by activation code. This crate defines that seam:
//! - [`KeyStore`] — get/create/bind/release/remove/list plus push-based
//!   change notification
//! - [`MemoryStore`] — an in-process reference implementation used by
//!   tests and local development
//!
//! The transport behind a production store (the hosted realtime database)
//! is deliberately out of scope; implementations only need to honor the
//! contract documented on the trait, most importantly that [`KeyStore::bind`]
//! is an atomic compare-and-swap on the record's status.

mod error;
mod memory;
mod watch;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use watch::{KeyEvent, KeyWatch};

use async_trait::async_trait;
use latchkey_types::{Binding, KeyCode, KeyDraft, KeyRecord};

/// A shared store of activation key records, keyed by code.
///
/// Server-assigned timestamps (`created_at`) come from the store's own
/// clock, never the caller's, so a compromised admin client cannot
/// back-date issuance.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Fetches the record for a code, or `None` if it does not exist.
    async fn get(&self, code: &KeyCode) -> StoreResult<Option<KeyRecord>>;

    /// Writes a freshly issued record: `Unused`, no binding, `created_at`
    /// from the store's clock.
    ///
    /// Codes are constructed to make collisions negligible, so this is a
    /// plain keyed write with no uniqueness read-back.
    async fn create(&self, code: KeyCode, draft: KeyDraft) -> StoreResult<KeyRecord>;

    /// Applies a device binding — the one conditional write in the system.
    ///
    /// Succeeds only if the record is currently unused; two devices racing
    /// to activate the same code get exactly one winner. The loser sees
    /// [`StoreError::Conflict`] carrying the record that won. Absent codes
    /// fail with [`StoreError::NotFound`].
    async fn bind(&self, code: &KeyCode, binding: Binding) -> StoreResult<KeyRecord>;

    /// Clears the binding and returns the record to `Unused`, regardless
    /// of prior status (admin reset). Fails with [`StoreError::NotFound`]
    /// for unknown codes.
    async fn release(&self, code: &KeyCode) -> StoreResult<KeyRecord>;

    /// Deletes the record unconditionally. Idempotent: removing an absent
    /// code is not an error.
    async fn remove(&self, code: &KeyCode) -> StoreResult<()>;

    /// Returns the full current set of records, for display and filtering
    /// only — no gating logic depends on it.
    async fn list(&self) -> StoreResult<Vec<KeyRecord>>;

    /// Subscribes to changes for a single code.
    async fn watch(&self, code: &KeyCode) -> KeyWatch;

    /// Subscribes to changes across all codes (admin listing feed).
    async fn watch_all(&self) -> KeyWatch;
}

//! The activation key record and its lifecycle states.
//!
//! One record exists per issued license, keyed by its activation code in
//! the shared store. The record moves `unused → activated` exactly once
//! (first successful activation binds it to a device), displays as
//! `expired` purely as a function of wall-clock time, and returns to
//! `unused` only through an explicit admin reset.

use crate::ids::{DeviceId, KeyCode};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive metadata about the license holder.
///
/// Informational only — gating decisions never consult these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Display name of the client.
    pub name: String,
    /// Contact phone number, if known.
    #[serde(default)]
    pub phone: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl ClientInfo {
    /// Creates client info with just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
            notes: None,
        }
    }
}

/// The lifecycle status of an activation key.
///
/// Only `Unused` and `Activated` are ever written to the shared store.
/// `Expired` is derived from the clock on every read rather than persisted
/// as a one-way transition, and `Tampered` is a client-local overlay the
/// engine produces when it detects clock rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    /// Issued but not yet bound to a device.
    Unused,
    /// Bound to a device and inside its validity window.
    Activated,
    /// Past the end of its validity window (derived, never persisted).
    Expired,
    /// Clock rollback detected on the consuming device (client-local).
    Tampered,
}

/// The device binding created at first successful activation.
///
/// All three fields are set together, exactly once; a record either has a
/// complete binding or none at all. An admin reset discards the whole
/// binding, never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// The device the key is bound to.
    pub device_id: DeviceId,
    /// When the key was first activated.
    pub activated_at: DateTime<Utc>,
    /// End of the validity window. Computed once at activation and never
    /// recomputed.
    pub expires_at: DateTime<Utc>,
}

impl Binding {
    /// Creates a binding starting at `activated_at`, valid for
    /// `duration_days` days.
    #[must_use]
    pub fn new(device_id: DeviceId, activated_at: DateTime<Utc>, duration_days: u32) -> Self {
        Self {
            device_id,
            activated_at,
            expires_at: activated_at + Duration::days(i64::from(duration_days)),
        }
    }
}

/// What the issuer submits to the store when creating a key.
///
/// The store assigns `created_at` from its own clock and initializes the
/// record as `Unused` with no binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDraft {
    /// License holder metadata.
    pub client: ClientInfo,
    /// Validity length in days once activated. Positive; immutable after
    /// issuance.
    pub duration_days: u32,
}

/// One activation key record, as stored and synchronized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Unique activation code; the record's key in the store.
    pub code: KeyCode,
    /// License holder metadata.
    pub client: ClientInfo,
    /// Validity length in days once activated.
    pub duration_days: u32,
    /// Persisted lifecycle status (`Unused` or `Activated`).
    pub status: KeyStatus,
    /// Issuance timestamp, assigned by the store's clock.
    pub created_at: DateTime<Utc>,
    /// Device binding, present iff the key has been activated.
    #[serde(default)]
    pub binding: Option<Binding>,
}

impl KeyRecord {
    /// Creates a freshly issued record: `Unused`, no binding.
    #[must_use]
    pub fn issued(code: KeyCode, draft: KeyDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            client: draft.client,
            duration_days: draft.duration_days,
            status: KeyStatus::Unused,
            created_at,
            binding: None,
        }
    }

    /// Returns true if the key has never been activated (or was reset).
    #[must_use]
    pub fn is_unused(&self) -> bool {
        self.status == KeyStatus::Unused && self.binding.is_none()
    }

    /// Returns true if the key is bound and past its validity window.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.binding.as_ref().is_some_and(|b| now > b.expires_at)
    }

    /// Returns the device the key is bound to, if any.
    #[must_use]
    pub fn bound_device(&self) -> Option<&DeviceId> {
        self.binding.as_ref().map(|b| &b.device_id)
    }

    /// The status to display for this record at `now`.
    ///
    /// Expiry is recomputed on every read; it is never written back to the
    /// store, so a reset can always return the record to `Unused`.
    #[must_use]
    pub fn display_status(&self, now: DateTime<Utc>) -> KeyStatus {
        if self.is_expired_at(now) {
            KeyStatus::Expired
        } else {
            self.status
        }
    }

    /// Returns a copy of this record with the binding applied.
    #[must_use]
    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.status = KeyStatus::Activated;
        self.binding = Some(binding);
        self
    }

    /// Returns a copy of this record with the binding cleared (admin
    /// reset). Code, duration, creation time, and client metadata are
    /// untouched.
    #[must_use]
    pub fn released(mut self) -> Self {
        self.status = KeyStatus::Unused;
        self.binding = None;
        self
    }
}

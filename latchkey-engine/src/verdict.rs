//! The gating state machine: from a key record and local integrity
//! signals to a verdict.
//!
//! [`evaluate`] is a pure function so the decision logic is testable
//! without a store or a clock. The engine wraps it with the persisted
//! watermark and the tamper latch; the application shell maps the verdict
//! to one of its UI modes (run / locked with reason / activation prompt).

use chrono::{DateTime, Utc};
use latchkey_types::{KeyRecord, KeyStatus};
use serde::{Deserialize, Serialize};

/// The engine's current gating decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No key, or the key is unused — show the activation prompt.
    Inactive,
    /// Bound to this device and inside the validity window — run the app.
    Active,
    /// Past the validity window. Terminal until an admin reset.
    Expired,
    /// Clock rollback detected. Terminal until an admin reset.
    Tampered,
}

impl Verdict {
    /// Returns true if the protected application may run.
    #[must_use]
    pub fn allows_run(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Derives a verdict from a record and the device's time signals.
///
/// `last_observed` is the anti-rollback watermark: the latest local time
/// this device has ever seen (`None` on a device that has never evaluated
/// before). The rollback check runs BEFORE the expiry check — a clock
/// wound backwards must read as tampering, not as a license that became
/// valid again.
#[must_use]
pub fn evaluate(
    record: Option<&KeyRecord>,
    local_now: DateTime<Utc>,
    last_observed: Option<DateTime<Utc>>,
) -> Verdict {
    let Some(record) = record else {
        return Verdict::Inactive;
    };
    if record.status == KeyStatus::Unused {
        return Verdict::Inactive;
    }
    // A record that claims to be activated but carries no binding violates
    // the data contract; the gate fails closed.
    let Some(binding) = record.binding.as_ref() else {
        return Verdict::Inactive;
    };

    if last_observed.is_some_and(|watermark| local_now < watermark) {
        return Verdict::Tampered;
    }
    if local_now > binding.expires_at {
        return Verdict::Expired;
    }
    Verdict::Active
}

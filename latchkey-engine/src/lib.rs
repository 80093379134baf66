//! Activation engine for Latchkey.
//!
//! This crate is the protected application's half of the activation
//! contract:
//! - One-time activation: bind an issued code to this device through the
//!   store's atomic conditional write
//! - Gating verdicts: a pure state machine from record + clock signals to
//!   `inactive | active | expired | tampered`
//! - Tamper detection: a persisted anti-rollback watermark; a clock that
//!   moves backwards locks the gate until an admin reset
//! - Live revocation: a store subscription so admin resets and deletions
//!   take effect without restarting the application
//!
//! The application shell maps the verdict to its UI (run the app, show a
//! locked screen with the reason, or show the activation prompt); that
//! mapping is the shell's concern, not the engine's.

mod device;
mod engine;
mod error;
mod state;
mod verdict;

pub use device::fingerprint;
pub use engine::{ActivationEngine, EngineConfig, Subscription};
pub use error::{EngineError, EngineResult};
pub use state::{ClockWatermark, EngineState, StateFile};
pub use verdict::{evaluate, Verdict};

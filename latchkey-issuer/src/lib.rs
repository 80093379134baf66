//! Activation key issuance for Latchkey.
//!
//! This crate is the issuing authority's half of the activation contract:
//! - Code generation (prefix + base36 timestamp + random suffix)
//! - Issuing unused key records into the shared store
//! - Admin reset and deletion
//!
//! The consuming client's half (activation, verdicts, tamper detection)
//! lives in `latchkey-engine`.

pub mod codegen;
mod error;
mod issuer;

pub use error::{IssuerError, IssuerResult};
pub use issuer::KeyIssuer;

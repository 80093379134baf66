//! Identifier types used throughout the Latchkey core.
//!
//! Activation codes are human-copyable strings (they double as the record
//! key in the shared store), so both identifiers are string newtypes rather
//! than UUIDs.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A unique activation code, immutable once issued.
///
/// Codes are normalized to uppercase with surrounding whitespace removed,
/// so user input copied from an email or chat message compares equal to
/// the issued code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(String);

impl KeyCode {
    /// Parses a code from user input, normalizing case and whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty after trimming.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let normalized = input.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(Error::InvalidCode("code must not be empty".to_string()));
        }
        Ok(Self(normalized))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for KeyCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Identifier of the device an activation key is bound to.
///
/// Opaque to the core: the engine supplies a hardware fingerprint by
/// default, but any stable string works.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

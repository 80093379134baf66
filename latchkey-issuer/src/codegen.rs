//! Activation code generation.
//!
//! A code combines a fixed prefix, the issuance time encoded in base36,
//! and a short random suffix: `LK-<stamp>-<suffix>`. Uniqueness is
//! probabilistic — the store is keyed by code and a write is atomic per
//! key, so two codes would have to collide in the same second AND draw the
//! same suffix out of a 31^5 space before anything could go wrong. That
//! probability is accepted as negligible; there is no read-back check.

use latchkey_types::KeyCode;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed prefix identifying Latchkey codes at a glance.
const CODE_PREFIX: &str = "LK";

/// Alphabet for the random suffix. Skips 0/O/1/I/L so codes survive being
/// read over the phone or copied by hand.
const SUFFIX_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

/// Length of the random suffix.
const SUFFIX_LEN: usize = 5;

/// Generates a new activation code for the current instant.
#[must_use]
pub fn generate() -> KeyCode {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before Unix epoch")
        .as_secs();
    generate_at(secs)
}

/// Generates a code with an explicit timestamp component.
#[must_use]
pub fn generate_at(unix_secs: u64) -> KeyCode {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_ALPHABET.len());
            SUFFIX_ALPHABET[idx] as char
        })
        .collect();

    let raw = format!("{CODE_PREFIX}-{}-{suffix}", base36(unix_secs));
    KeyCode::parse(&raw).expect("generated code is never empty")
}

/// Encodes a number in uppercase base36.
fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}

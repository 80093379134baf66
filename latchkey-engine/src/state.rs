//! Device-local activation state.
//!
//! Three things live here, none of which ever enter the shared store:
//! - which code this device activated (so the app resumes its gate after
//!   a restart without re-prompting)
//! - the anti-rollback clock watermark
//! - the tamper latch
//!
//! Persisted as a small JSON file in the engine's state directory. The
//! state is exactly as durable as that directory: wiping it (e.g. an app
//! reinstall that clears app data) silently resets tamper detection.

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use latchkey_types::KeyCode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const STATE_FILE: &str = "activation.json";

/// The latest local time this device has ever observed.
///
/// Advances to `max(previous, now)` on every evaluation and never
/// regresses, even across restarts. A current reading behind the
/// watermark is the engine's sole tamper signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockWatermark(Option<DateTime<Utc>>);

impl ClockWatermark {
    /// The watermark value, or `None` if this device has never evaluated.
    #[must_use]
    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    /// Records an observation of `now`. Returns the watermark as it stood
    /// BEFORE this observation — that prior value is what the evaluation
    /// compares against.
    pub fn observe(&mut self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let prior = self.0;
        self.0 = Some(match prior {
            Some(watermark) => watermark.max(now),
            None => now,
        });
        prior
    }
}

/// Everything the engine persists on the device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineState {
    /// Code activated on this device, if any.
    #[serde(default)]
    pub code: Option<KeyCode>,
    /// Anti-rollback watermark.
    #[serde(default)]
    pub watermark: ClockWatermark,
    /// Set once clock rollback has been detected; cleared only when the
    /// gate re-enters the inactive state (admin reset or fresh
    /// activation).
    #[serde(default)]
    pub tampered: bool,
}

/// Loads and saves [`EngineState`] at a fixed location in the state
/// directory.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Creates a handle for the state file inside `dir`.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STATE_FILE),
        }
    }

    /// The file's full path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted state. A missing file is a fresh device, not
    /// an error.
    pub fn load(&self) -> EngineResult<EngineState> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| EngineError::State(format!("corrupt state file: {e}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(EngineState::default()),
            Err(err) => Err(EngineError::State(format!(
                "failed to read {}: {err}",
                self.path.display()
            ))),
        }
    }

    /// Writes the state, creating the directory if needed.
    pub fn save(&self, state: &EngineState) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| EngineError::State(format!("failed to create state dir: {e}")))?;
        }
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| EngineError::State(format!("failed to encode state: {e}")))?;
        fs::write(&self.path, json)
            .map_err(|e| EngineError::State(format!("failed to write {}: {e}", self.path.display())))
    }
}

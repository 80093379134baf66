//! The activation engine: binds a code to this device and keeps the
//! gating verdict current against the shared store and the local clock.

use crate::error::{EngineError, EngineResult};
use crate::state::{EngineState, StateFile};
use crate::verdict::{evaluate, Verdict};
use chrono::{DateTime, Utc};
use latchkey_store::{KeyEvent, KeyStore, StoreError};
use latchkey_types::{Binding, DeviceId, KeyCode, KeyRecord, KeyStatus};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Configuration for the activation engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory for the device-local activation state (watermark, tamper
    /// latch, activated code). Tamper detection is exactly as durable as
    /// this directory.
    pub state_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
        Self {
            state_dir: base.join("latchkey"),
        }
    }
}

impl EngineConfig {
    /// Creates a config with an explicit state directory.
    #[must_use]
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }
}

struct Inner {
    /// Last-known record for the activated code, updated by activation,
    /// restore, and the store subscription.
    record: Option<KeyRecord>,
    state: EngineState,
    file: StateFile,
}

impl Inner {
    /// Runs one evaluation against the clock reading `now`: advances the
    /// watermark, derives the verdict, applies the tamper latch.
    fn evaluate_at(&mut self, now: DateTime<Utc>) -> Verdict {
        let prior = self.state.watermark.observe(now);
        let verdict = match evaluate(self.record.as_ref(), now, prior) {
            Verdict::Tampered => {
                if !self.state.tampered {
                    warn!("clock rollback detected, locking gate");
                }
                self.state.tampered = true;
                Verdict::Tampered
            }
            Verdict::Inactive => {
                // An admin has reset or removed the record; the device
                // starts over with a clean slate.
                self.state.tampered = false;
                Verdict::Inactive
            }
            // Once rollback has been seen, a corrected clock alone does
            // not regain trust.
            _ if self.state.tampered => Verdict::Tampered,
            verdict => verdict,
        };
        self.persist();
        verdict
    }

    fn persist(&self) {
        if let Err(err) = self.file.save(&self.state) {
            warn!(%err, "failed to persist activation state");
        }
    }
}

/// The consuming client's half of the activation contract.
///
/// Construct one per process with the device's identity and a handle to
/// the shared store; the application shell calls [`activate`], renders
/// [`current_verdict`], and holds a [`subscribe`] subscription so admin
/// resets and deletions take effect without a restart.
///
/// [`activate`]: ActivationEngine::activate
/// [`current_verdict`]: ActivationEngine::current_verdict
/// [`subscribe`]: ActivationEngine::subscribe
pub struct ActivationEngine<S> {
    store: Arc<S>,
    device_id: DeviceId,
    inner: Arc<Mutex<Inner>>,
}

impl<S: KeyStore> ActivationEngine<S> {
    /// Creates an engine, loading any persisted activation state.
    ///
    /// # Errors
    ///
    /// Fails if an existing state file cannot be read or parsed.
    pub fn new(store: Arc<S>, device_id: DeviceId, config: EngineConfig) -> EngineResult<Self> {
        let file = StateFile::new(&config.state_dir);
        let state = file.load()?;
        Ok(Self {
            store,
            device_id,
            inner: Arc::new(Mutex::new(Inner {
                record: None,
                state,
                file,
            })),
        })
    }

    /// The identity this engine binds keys to.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Last-known record for the activated code, if any.
    #[must_use]
    pub fn current_record(&self) -> Option<KeyRecord> {
        self.inner.lock().expect("engine lock poisoned").record.clone()
    }

    /// Activates `code` for this device at the current instant.
    pub async fn activate(&self, code: &KeyCode) -> EngineResult<KeyRecord> {
        self.activate_at(code, Utc::now()).await
    }

    /// Activates `code` with an explicit activation instant.
    ///
    /// The binding (device, activation time, expiry) is written through
    /// the store's conditional update: if another device completes its
    /// activation first, this call loses with [`EngineError::Conflict`]
    /// and must not be retried blindly. A code that was already bound
    /// when fetched fails with [`EngineError::AlreadyUsed`] carrying the
    /// existing binding.
    pub async fn activate_at(&self, code: &KeyCode, now: DateTime<Utc>) -> EngineResult<KeyRecord> {
        let record = self
            .store
            .get(code)
            .await?
            .ok_or_else(|| EngineError::NotFound(code.clone()))?;

        match record.binding {
            None if record.status == KeyStatus::Unused => {
                let binding = Binding::new(self.device_id.clone(), now, record.duration_days);
                match self.store.bind(code, binding).await {
                    Ok(bound) => {
                        if let Some(b) = &bound.binding {
                            info!(code = %code, expires_at = %b.expires_at, "activated key on this device");
                        }
                        let mut inner = self.inner.lock().expect("engine lock poisoned");
                        inner.record = Some(bound.clone());
                        inner.state.code = Some(code.clone());
                        inner.state.tampered = false;
                        inner.persist();
                        Ok(bound)
                    }
                    Err(StoreError::Conflict { .. }) => Err(EngineError::Conflict),
                    Err(StoreError::NotFound(code)) => Err(EngineError::NotFound(code)),
                    Err(err) => Err(err.into()),
                }
            }
            Some(binding) => Err(EngineError::AlreadyUsed { binding }),
            // Malformed record: claims activated but carries no binding.
            None => Err(EngineError::Conflict),
        }
    }

    /// The engine's current gating decision.
    ///
    /// Synchronous and cheap: one lock, one clock read, one small state
    /// write. Safe to call on every application foreground event.
    #[must_use]
    pub fn current_verdict(&self) -> Verdict {
        self.verdict_at(Utc::now())
    }

    /// Evaluates the gate against an explicit clock reading.
    #[must_use]
    pub fn verdict_at(&self, now: DateTime<Utc>) -> Verdict {
        let mut inner = self.inner.lock().expect("engine lock poisoned");
        inner.evaluate_at(now)
    }

    /// Re-fetches the record for the code persisted on this device.
    ///
    /// Called on startup so the gate resumes without re-prompting. Returns
    /// `None` (and clears the stale local code) if no activation exists or
    /// the record has been deleted.
    pub async fn restore(&self) -> EngineResult<Option<KeyRecord>> {
        let code = {
            let inner = self.inner.lock().expect("engine lock poisoned");
            inner.state.code.clone()
        };
        let Some(code) = code else {
            return Ok(None);
        };

        let record = self.store.get(&code).await?;
        let mut inner = self.inner.lock().expect("engine lock poisoned");
        inner.record = record.clone();
        if record.is_none() {
            debug!(code = %code, "activated record no longer exists, clearing local state");
            inner.state.code = None;
            inner.persist();
        }
        Ok(record)
    }

    /// Subscribes to store changes for the activated code.
    ///
    /// A remote reset or deletion (an admin revoking the license) reaches
    /// the running application through this subscription: the engine
    /// re-applies the updated record idempotently and hands the resulting
    /// verdict to `on_change`. Dropping the returned [`Subscription`] (or
    /// calling [`Subscription::unsubscribe`]) stops delivery.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::NotActivated`] if no code has been
    /// activated or restored on this device.
    pub async fn subscribe<F>(&self, mut on_change: F) -> EngineResult<Subscription>
    where
        F: FnMut(Verdict) + Send + 'static,
    {
        let code = {
            let inner = self.inner.lock().expect("engine lock poisoned");
            inner.state.code.clone()
        }
        .ok_or(EngineError::NotActivated)?;

        let mut watch = self.store.watch(&code).await;
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            while let Some(event) = watch.recv().await {
                let verdict = {
                    let mut inner = inner.lock().expect("engine lock poisoned");
                    match event {
                        KeyEvent::Updated(record) => {
                            // Re-applying an identical record is a no-op;
                            // duplicates and re-deliveries are harmless.
                            inner.record = Some(record);
                        }
                        KeyEvent::Removed(code) => {
                            debug!(code = %code, "activated record removed remotely");
                            inner.record = None;
                            inner.state.code = None;
                        }
                    }
                    inner.evaluate_at(Utc::now())
                };
                on_change(verdict);
            }
            debug!("key subscription stream closed");
        });

        Ok(Subscription { handle })
    }
}

/// Handle for an active engine subscription. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stops delivery explicitly.
    pub fn unsubscribe(self) {
        self.handle.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

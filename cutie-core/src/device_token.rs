//! Device token lifecycle.
//!
//! ```text
//! NoToken ──ensure_token──▶ Registering ──ok──▶ HasToken
//!    ▲                          │ err                │
//!    │                          ▼                    │ 401 / reset
//!    └──────────── NoToken (attempted) ◀─────────────┘
//! ```
//!
//! At most one registration is attempted per process until a 401 or an
//! explicit reset clears the `attempted` flag. Concurrent first calls queue on
//! an async gate and share the outcome of the single attempt. The attempt runs
//! as its own task, so it settles even when the caller that started it is
//! dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use reqwest::Method;

use crate::client::{decode_response, with_identity_headers};
use crate::config::Configuration;
use crate::error::CutieResult;
use crate::http_request::Request;
use crate::models::{DeviceRegistration, DeviceRegistrationResponse};
use crate::platform::{Accessibility, DeviceInfo, SecureStore};
use crate::SDK_VERSION;

/// Observable token state, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TokenState {
    /// No token stored.
    NoToken,
    /// A registration request is in flight.
    Registering,
    /// A token is stored and attached to requests.
    HasToken,
}

/// Owns the device token and its registration.
pub struct DeviceTokenManager {
    slot: Arc<TokenSlot>,
    gate: Arc<tokio::sync::Mutex<()>>,
}

/// State shared with the registration task.
struct TokenSlot {
    store: Arc<dyn SecureStore>,
    storage_key: String,
    /// Last known token, kept in case the secure store refuses the write.
    cached: Mutex<Option<String>>,
    /// A token the server rejected but the store failed to delete.
    revoked: Mutex<Option<String>>,
    attempted: AtomicBool,
    registering: AtomicBool,
}

impl DeviceTokenManager {
    /// Creates a manager persisting into `store` under a key bound to
    /// `(app_id, device_id)`.
    #[must_use]
    pub fn new(store: Arc<dyn SecureStore>, app_id: &str, device_id: &str) -> Self {
        Self {
            slot: Arc::new(TokenSlot {
                store,
                storage_key: storage_key(app_id, device_id),
                cached: Mutex::new(None),
                revoked: Mutex::new(None),
                attempted: AtomicBool::new(false),
                registering: AtomicBool::new(false),
            }),
            gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TokenState {
        if self.slot.registering.load(Ordering::SeqCst) {
            TokenState::Registering
        } else if self.current_token().is_some() {
            TokenState::HasToken
        } else {
            TokenState::NoToken
        }
    }

    /// Whether a registration has been attempted since the last reset.
    #[must_use]
    pub fn attempted(&self) -> bool {
        self.slot.attempted.load(Ordering::SeqCst)
    }

    /// The stored token, if any. Storage errors read as "no token".
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.slot.current_token()
    }

    /// Returns a token, registering first if none is stored and no attempt
    /// has been made yet. `None` means proceed without a token.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn ensure_token(
        &self,
        request: &Request,
        config: &Arc<Configuration>,
        device: &DeviceInfo,
    ) -> Option<String> {
        if let Some(token) = self.current_token() {
            return Some(token);
        }
        // Settled attempt: don't queue. An attempt in flight: wait for its outcome.
        if self.attempted() && !self.slot.registering.load(Ordering::SeqCst) {
            return None;
        }

        let gate = Arc::clone(&self.gate).lock_owned().await;
        if let Some(token) = self.current_token() {
            return Some(token);
        }
        let registering = RegisteringFlag::raise(Arc::clone(&self.slot));
        if self.slot.attempted.swap(true, Ordering::SeqCst) {
            return None;
        }

        // The task owns the gate until the attempt settles, so callers queued
        // behind it see the outcome even if this future is dropped.
        let slot = Arc::clone(&self.slot);
        let request = request.clone();
        let config = Arc::clone(config);
        let device = device.clone();
        let attempt = tokio::spawn(async move {
            let token = match slot.register(&request, &config, &device).await {
                Ok(token) => Some(token),
                Err(e) => {
                    log::warn!("Device registration failed, continuing without a token: {e}");
                    None
                }
            };
            drop(registering);
            drop(gate);
            token
        });

        match attempt.await {
            Ok(token) => token,
            Err(e) => {
                log::error!("Device registration task did not complete: {e}");
                None
            }
        }
    }

    /// Forgets the token and clears the `attempted` flag so the next request
    /// registers again.
    pub fn invalidate(&self) {
        self.slot.invalidate();
    }

    /// Explicit recovery entry point; same effect as a 401.
    pub fn reset(&self) {
        log::info!("Resetting device token");
        self.invalidate();
    }
}

impl TokenSlot {
    fn current_token(&self) -> Option<String> {
        let cached = lock(&self.cached).clone();
        if cached.is_some() {
            return cached;
        }

        match self.store.get(self.storage_key.clone()) {
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(token) if token.is_empty() => None,
                Ok(token) if self.is_revoked(&token) => {
                    self.delete_revoked();
                    None
                }
                Ok(token) => {
                    self.set_cached(Some(token.clone()));
                    Some(token)
                }
                Err(e) => {
                    log::warn!("Stored device token is not valid UTF-8: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read device token: {e}");
                None
            }
        }
    }

    /// Performs `POST /v1/device/register` and persists the returned token.
    async fn register(
        &self,
        request: &Request,
        config: &Configuration,
        device: &DeviceInfo,
    ) -> CutieResult<String> {
        let metadata = config.metadata();
        let body = DeviceRegistration {
            device_id: config.device_id().to_string(),
            app_id: config.app_id().to_string(),
            platform: device.platform.clone(),
            os_version: device.os_version.clone(),
            device_model: device.device_model.clone(),
            app_version: metadata.app_version,
            app_build: metadata.app_build,
            sdk_version: SDK_VERSION,
            user_id: metadata.user_id,
        };

        let url = config.endpoint("/v1/device/register")?;
        let builder = with_identity_headers(request.req(Method::POST, url), config).json(&body);
        let response = request.handle(builder).await?;
        let registration: DeviceRegistrationResponse = decode_response(response).await?;

        log::info!(
            "Device registered (new: {}, token id: {})",
            registration.is_new,
            registration.token_id.as_deref().unwrap_or("-")
        );
        self.persist(&registration.device_token);
        Ok(registration.device_token)
    }

    fn invalidate(&self) {
        let rejected = lock(&self.cached).take();
        match self.store.delete(self.storage_key.clone()) {
            Ok(()) => *lock(&self.revoked) = None,
            Err(e) => {
                log::error!("Failed to delete device token, ignoring the stored copy: {e}");
                if let Some(token) = rejected {
                    *lock(&self.revoked) = Some(token);
                }
            }
        }
        self.attempted.store(false, Ordering::SeqCst);
    }

    fn is_revoked(&self, token: &str) -> bool {
        lock(&self.revoked).as_deref() == Some(token)
    }

    fn delete_revoked(&self) {
        match self.store.delete(self.storage_key.clone()) {
            Ok(()) => *lock(&self.revoked) = None,
            Err(e) => log::debug!("Rejected device token still in the store: {e}"),
        }
    }

    fn persist(&self, token: &str) {
        self.set_cached(Some(token.to_string()));
        *lock(&self.revoked) = None;
        if let Err(e) = self.store.set(
            self.storage_key.clone(),
            token.as_bytes().to_vec(),
            Accessibility::AfterFirstUnlockThisDeviceOnly,
        ) {
            log::error!("Failed to persist device token, keeping it in memory: {e}");
        }
    }

    fn set_cached(&self, token: Option<String>) {
        *lock(&self.cached) = token;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn storage_key(app_id: &str, device_id: &str) -> String {
    format!("cutie.device_token.{app_id}.{device_id}")
}

/// Holds `registering` high for the lifetime of the value, including when the
/// registration task unwinds.
struct RegisteringFlag(Arc<TokenSlot>);

impl RegisteringFlag {
    fn raise(slot: Arc<TokenSlot>) -> Self {
        slot.registering.store(true, Ordering::SeqCst);
        Self(slot)
    }
}

impl Drop for RegisteringFlag {
    fn drop(&mut self) {
        self.0.registering.store(false, Ordering::SeqCst);
    }
}

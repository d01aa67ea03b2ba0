//! Optional hardware attestation (App Attest or equivalent).
//!
//! The key handle and the attested flag live in the secure store, so the
//! state survives relaunches:
//!
//! `Unattested → KeyGenerated → Attested`
//!
//! Assertions are only produced in the `Attested` state.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Method;

use crate::client::{to_body, ApiClient};
use crate::crypto::{sha256, sha256_concat};
use crate::error::{AttestationError, StorageResult};
use crate::models::{
    AssertionSubmission, AssertionVerdict, AttestationChallenge, AttestationStatus,
    AttestationSubmission, AttestationVerdict,
};
use crate::platform::{Accessibility, AttestationService, SecureStore};

/// Secure-store key holding the attestation key id.
pub const KEY_ID_KEY: &str = "cutie.attestation.key_id";
/// Secure-store key holding the attested flag.
pub const ATTESTED_KEY: &str = "cutie.attestation.attested";

/// Local attestation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum AttestationState {
    /// No key handle stored.
    Unattested,
    /// A hardware key exists but the backend has not verified it.
    KeyGenerated,
    /// The backend verified the key; assertions can be produced.
    Attested,
}

/// Drives key generation, attestation and assertions.
pub struct AttestationManager {
    service: Arc<dyn AttestationService>,
    store: Arc<dyn SecureStore>,
    /// Serialises attestation runs.
    running: tokio::sync::Mutex<()>,
}

impl AttestationManager {
    /// Creates a manager over the platform service and secure store.
    #[must_use]
    pub fn new(service: Arc<dyn AttestationService>, store: Arc<dyn SecureStore>) -> Self {
        Self {
            service,
            store,
            running: tokio::sync::Mutex::new(()),
        }
    }

    /// Whether the platform can attest keys at all.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.service.is_supported()
    }

    /// Current local state. Storage read errors read as `Unattested`.
    #[must_use]
    pub fn state(&self) -> AttestationState {
        match (self.key_id(), self.attested_flag()) {
            (None, _) => AttestationState::Unattested,
            (Some(_), false) => AttestationState::KeyGenerated,
            (Some(_), true) => AttestationState::Attested,
        }
    }

    /// Shorthand for `state() == Attested`.
    #[must_use]
    pub fn is_attested(&self) -> bool {
        self.state() == AttestationState::Attested
    }

    /// Runs the full attestation flow against the backend.
    ///
    /// # Errors
    ///
    /// - `NotSupported` if the platform cannot attest.
    /// - `KeyGenerationFailed` if no hardware key can be created.
    /// - `HashingFailed` if the backend returns an empty challenge.
    /// - `AttestationFailed` if the platform or the backend rejects the attestation.
    /// - `ServerError` for transport and HTTP errors.
    pub async fn perform_attestation(&self, client: &ApiClient) -> Result<(), AttestationError> {
        if !self.is_supported() {
            return Err(AttestationError::NotSupported);
        }
        let _running = self.running.lock().await;

        let key_id = match self.key_id() {
            Some(key_id) => key_id,
            None => self.generate_key()?,
        };

        let challenge: AttestationChallenge = client
            .perform(Method::POST, "/v1/device/attest/challenge", None)
            .await?;
        let client_data_hash = client_data_hash(&challenge.challenge, &key_id)?;

        let attestation = self
            .service
            .attest_key(key_id.clone(), client_data_hash.to_vec())
            .map_err(|e| AttestationError::AttestationFailed {
                error: e.to_string(),
            })?;

        let submission = to_body(&AttestationSubmission {
            key_id: &key_id,
            attestation: STANDARD.encode(attestation),
            challenge: &challenge.challenge,
        })?;
        let verdict: AttestationVerdict = client
            .perform(Method::POST, "/v1/device/attest", Some(&submission))
            .await?;

        if !verdict.verified {
            return Err(AttestationError::AttestationFailed {
                error: "the backend did not verify the attestation".to_string(),
            });
        }

        self.store
            .set(
                ATTESTED_KEY.to_string(),
                b"1".to_vec(),
                Accessibility::AfterFirstUnlockThisDeviceOnly,
            )
            .map_err(|e| AttestationError::AttestationFailed {
                error: format!("failed to persist attestation state: {e}"),
            })?;
        log::info!("Device attested");
        Ok(())
    }

    /// Signs `SHA-256(data)` with the attested key, returning base64.
    ///
    /// # Errors
    ///
    /// `NotSupported` on platforms without attestation (checked first),
    /// `NotAttested` before a successful attestation, `AssertionFailed` if the
    /// platform refuses to sign.
    pub fn generate_assertion(&self, data: &[u8]) -> Result<String, AttestationError> {
        if !self.is_supported() {
            return Err(AttestationError::NotSupported);
        }
        let key_id = match (self.key_id(), self.attested_flag()) {
            (Some(key_id), true) => key_id,
            _ => return Err(AttestationError::NotAttested),
        };

        let assertion = self
            .service
            .generate_assertion(key_id, sha256(data).to_vec())
            .map_err(|e| AttestationError::AssertionFailed {
                error: e.to_string(),
            })?;
        Ok(STANDARD.encode(assertion))
    }

    /// Asks the backend to verify an assertion over `data`.
    ///
    /// # Errors
    ///
    /// Assertion errors from [`Self::generate_assertion`] or `ServerError`.
    pub async fn verify_assertion(
        &self,
        client: &ApiClient,
        data: &[u8],
    ) -> Result<bool, AttestationError> {
        let assertion = self.generate_assertion(data)?;
        let key_id = self.key_id().ok_or(AttestationError::NotAttested)?;
        let submission = to_body(&AssertionSubmission {
            key_id: &key_id,
            assertion: &assertion,
            client_data: STANDARD.encode(data),
        })?;
        let verdict: AssertionVerdict = client
            .perform(Method::POST, "/v1/device/attest/assert", Some(&submission))
            .await?;
        Ok(verdict.valid)
    }

    /// Fetches the backend's view of this device's attestation.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` for transport and HTTP errors.
    pub async fn status(&self, client: &ApiClient) -> Result<AttestationStatus, AttestationError> {
        Ok(client
            .perform(Method::GET, "/v1/device/attest/status", None)
            .await?)
    }

    /// Revokes the attestation on the backend, then resets local state.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if the backend call fails; local state is kept in that case.
    pub async fn revoke(&self, client: &ApiClient) -> Result<(), AttestationError> {
        client
            .perform_unit(Method::DELETE, "/v1/device/attest", None)
            .await?;
        self.reset();
        Ok(())
    }

    /// Discards the key handle locally. No network.
    pub fn reset(&self) {
        for key in [ATTESTED_KEY, KEY_ID_KEY] {
            if let Err(e) = self.store.delete(key.to_string()) {
                log::error!("Failed to delete {key}: {e}");
            }
        }
        log::info!("Attestation state reset");
    }

    fn generate_key(&self) -> Result<String, AttestationError> {
        let key_id = self.service.generate_key().map_err(|e| {
            log::error!("Attestation key generation failed: {e}");
            AttestationError::KeyGenerationFailed
        })?;

        let persisted: StorageResult<()> = self
            .store
            .set(
                KEY_ID_KEY.to_string(),
                key_id.as_bytes().to_vec(),
                Accessibility::AfterFirstUnlockThisDeviceOnly,
            )
            .and_then(|()| self.store.delete(ATTESTED_KEY.to_string()));
        persisted.map_err(|e| AttestationError::AttestationFailed {
            error: format!("failed to persist attestation key: {e}"),
        })?;

        log::debug!("Generated attestation key");
        Ok(key_id)
    }

    fn key_id(&self) -> Option<String> {
        match self.store.get(KEY_ID_KEY.to_string()) {
            Ok(Some(bytes)) => String::from_utf8(bytes).ok().filter(|id| !id.is_empty()),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read attestation key id: {e}");
                None
            }
        }
    }

    fn attested_flag(&self) -> bool {
        matches!(self.store.get(ATTESTED_KEY.to_string()), Ok(Some(value)) if value == b"1")
    }
}

/// `SHA-256(challenge || key_id)`.
///
/// # Errors
///
/// Returns `HashingFailed` for an empty challenge.
pub fn client_data_hash(challenge: &str, key_id: &str) -> Result<[u8; 32], AttestationError> {
    if challenge.is_empty() {
        return Err(AttestationError::HashingFailed);
    }
    Ok(sha256_concat(&[challenge.as_bytes(), key_id.as_bytes()]))
}

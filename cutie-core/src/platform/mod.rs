//! Platform capabilities the SDK depends on but cannot own.
//!
//! The host app provides these through foreign trait implementations:
//!
//! - [`SecureStore`]: Keychain Services on Apple platforms, `EncryptedSharedPreferences`
//!   backed by the Android Keystore elsewhere. Holds the device token and the
//!   attestation key handle.
//! - [`KeyValueStore`]: `UserDefaults` / `SharedPreferences`. Holds the device
//!   identifier and analytics consent flags.
//! - [`AttestationService`]: `DCAppAttestService` on iOS. Platforms without
//!   hardware attestation return `false` from `is_supported`.
//! - [`PlatformProvider`]: bundles the above plus static device information.
//!
//! [`memory`] contains in-process implementations for tests and for hosts that
//! run the SDK without a secure OS facility.

use std::sync::Arc;

use crate::error::{PlatformError, StorageResult};

pub mod memory;

pub use memory::{MemoryKeyValueStore, MemoryPlatform, MemorySecureStore, UnsupportedAttestation};

/// Access-control class requested when writing to the secure store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum Accessibility {
    /// Readable after the first unlock following boot; never migrated to another device.
    ///
    /// Maps to `kSecAttrAccessibleAfterFirstUnlockThisDeviceOnly`.
    AfterFirstUnlockThisDeviceOnly,
}

/// Secure key-value storage for credentials.
#[uniffi::export(with_foreign)]
pub trait SecureStore: Send + Sync {
    /// Reads the value stored under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store refuses the read.
    fn get(&self, key: String) -> StorageResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store refuses the write.
    fn set(&self, key: String, value: Vec<u8>, accessibility: Accessibility) -> StorageResult<()>;

    /// Deletes the value under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store refuses the delete.
    fn delete(&self, key: String) -> StorageResult<()>;
}

/// Non-secret local preferences.
#[uniffi::export(with_foreign)]
pub trait KeyValueStore: Send + Sync {
    /// Reads the string stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_string(&self, key: String) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set_string(&self, key: String, value: String) -> StorageResult<()>;

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: String) -> StorageResult<()>;
}

/// Hardware-backed key attestation (App Attest).
#[uniffi::export(with_foreign)]
pub trait AttestationService: Send + Sync {
    /// Whether this hardware and OS can generate and attest keys.
    fn is_supported(&self) -> bool;

    /// Generates a new hardware key and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the secure enclave refuses to create the key.
    fn generate_key(&self) -> Result<String, PlatformError>;

    /// Asks the platform attestation service to attest `key_id`, binding `client_data_hash`.
    ///
    /// Returns the raw attestation object.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the key or the service is unreachable.
    fn attest_key(&self, key_id: String, client_data_hash: Vec<u8>) -> Result<Vec<u8>, PlatformError>;

    /// Signs `client_data_hash` with the attested key and returns the raw assertion.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or signing fails.
    fn generate_assertion(
        &self,
        key_id: String,
        client_data_hash: Vec<u8>,
    ) -> Result<Vec<u8>, PlatformError>;
}

/// Static description of the device, sent during device registration.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct DeviceInfo {
    /// Platform name, e.g. `ios`, `macos`, `android`.
    pub platform: String,
    /// OS version string, e.g. `17.4.1`.
    pub os_version: String,
    /// Hardware model identifier, e.g. `iPhone15,2`.
    pub device_model: String,
}

/// Provider of every platform capability the SDK needs.
#[uniffi::export(with_foreign)]
pub trait PlatformProvider: Send + Sync {
    /// Returns the secure credential store.
    fn secure_store(&self) -> Arc<dyn SecureStore>;

    /// Returns the local preferences store.
    fn key_value_store(&self) -> Arc<dyn KeyValueStore>;

    /// Returns the attestation service.
    fn attestation_service(&self) -> Arc<dyn AttestationService>;

    /// Returns static device information.
    fn device_info(&self) -> DeviceInfo;
}

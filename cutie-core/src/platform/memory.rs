//! In-memory implementations of platform traits.
//!
//! These are NOT secure: values live in process memory and vanish on exit.
//! They back unit tests, integration tests and hosts without an OS keychain.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{PlatformError, StorageError, StorageResult};

use super::{
    Accessibility, AttestationService, DeviceInfo, KeyValueStore, PlatformProvider,
    SecureStore,
};

/// In-memory secure store.
#[derive(Default)]
pub struct MemorySecureStore {
    entries: Mutex<HashMap<String, (Vec<u8>, Accessibility)>>,
}

impl MemorySecureStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accessibility class recorded for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    pub fn accessibility(&self, key: &str) -> StorageResult<Option<Accessibility>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StorageError::SecureStore("mutex poisoned".to_string()))?;
        Ok(guard.get(key).map(|(_, accessibility)| *accessibility))
    }
}

impl SecureStore for MemorySecureStore {
    fn get(&self, key: String) -> StorageResult<Option<Vec<u8>>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StorageError::SecureStore("mutex poisoned".to_string()))?;
        Ok(guard.get(&key).map(|(value, _)| value.clone()))
    }

    fn set(&self, key: String, value: Vec<u8>, accessibility: Accessibility) -> StorageResult<()> {
        self.entries
            .lock()
            .map_err(|_| StorageError::SecureStore("mutex poisoned".to_string()))?
            .insert(key, (value, accessibility));
        Ok(())
    }

    fn delete(&self, key: String) -> StorageResult<()> {
        self.entries
            .lock()
            .map_err(|_| StorageError::SecureStore("mutex poisoned".to_string()))?
            .remove(&key);
        Ok(())
    }
}

/// In-memory preferences store.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_string(&self, key: String) -> StorageResult<Option<String>> {
        let guard = self
            .values
            .lock()
            .map_err(|_| StorageError::KeyValueStore("mutex poisoned".to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    fn set_string(&self, key: String, value: String) -> StorageResult<()> {
        self.values
            .lock()
            .map_err(|_| StorageError::KeyValueStore("mutex poisoned".to_string()))?
            .insert(key, value);
        Ok(())
    }

    fn remove(&self, key: String) -> StorageResult<()> {
        self.values
            .lock()
            .map_err(|_| StorageError::KeyValueStore("mutex poisoned".to_string()))?
            .remove(&key);
        Ok(())
    }
}

/// Attestation service for platforms without hardware attestation.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedAttestation;

impl AttestationService for UnsupportedAttestation {
    fn is_supported(&self) -> bool {
        false
    }

    fn generate_key(&self) -> Result<String, PlatformError> {
        Err(PlatformError::Failed("attestation unsupported".to_string()))
    }

    fn attest_key(&self, _key_id: String, _client_data_hash: Vec<u8>) -> Result<Vec<u8>, PlatformError> {
        Err(PlatformError::Failed("attestation unsupported".to_string()))
    }

    fn generate_assertion(
        &self,
        _key_id: String,
        _client_data_hash: Vec<u8>,
    ) -> Result<Vec<u8>, PlatformError> {
        Err(PlatformError::Failed("attestation unsupported".to_string()))
    }
}

/// Platform provider backed entirely by memory.
pub struct MemoryPlatform {
    secure_store: Arc<MemorySecureStore>,
    key_value_store: Arc<MemoryKeyValueStore>,
    attestation: Arc<dyn AttestationService>,
    device_info: DeviceInfo,
}

impl MemoryPlatform {
    /// Creates a platform without attestation support.
    #[must_use]
    pub fn new() -> Self {
        Self::with_attestation(Arc::new(UnsupportedAttestation))
    }

    /// Creates a platform using the given attestation service.
    #[must_use]
    pub fn with_attestation(attestation: Arc<dyn AttestationService>) -> Self {
        Self {
            secure_store: Arc::new(MemorySecureStore::new()),
            key_value_store: Arc::new(MemoryKeyValueStore::new()),
            attestation,
            device_info: DeviceInfo {
                platform: std::env::consts::OS.to_string(),
                os_version: "unknown".to_string(),
                device_model: "memory".to_string(),
            },
        }
    }

    /// Concrete handle to the secure store, for inspection in tests.
    #[must_use]
    pub fn memory_secure_store(&self) -> Arc<MemorySecureStore> {
        Arc::clone(&self.secure_store)
    }

    /// Concrete handle to the preferences store, for inspection in tests.
    #[must_use]
    pub fn memory_key_value_store(&self) -> Arc<MemoryKeyValueStore> {
        Arc::clone(&self.key_value_store)
    }
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformProvider for MemoryPlatform {
    fn secure_store(&self) -> Arc<dyn SecureStore> {
        self.secure_store.clone()
    }

    fn key_value_store(&self) -> Arc<dyn KeyValueStore> {
        self.key_value_store.clone()
    }

    fn attestation_service(&self) -> Arc<dyn AttestationService> {
        Arc::clone(&self.attestation)
    }

    fn device_info(&self) -> DeviceInfo {
        self.device_info.clone()
    }
}

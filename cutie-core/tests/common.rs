//! Common test utilities shared across integration tests.

use std::sync::Arc;

use cutie_core::platform::{
    AttestationService, DeviceInfo, KeyValueStore, MemoryKeyValueStore, MemorySecureStore,
    PlatformProvider, SecureStore, UnsupportedAttestation,
};
use cutie_core::config::CutieConfig;

/// Production API base URL.
pub const API_URL: &str = "https://api.cuti-e.com";

/// Platform provider standing in for an iOS host.
pub struct TestPlatform {
    /// Backing store for device tokens and attestation state.
    pub secure_store: Arc<MemorySecureStore>,
    /// Backing store for the device id and consent flags.
    pub key_value_store: Arc<MemoryKeyValueStore>,
}

impl TestPlatform {
    /// Fresh platform with empty stores.
    pub fn new() -> Self {
        Self {
            secure_store: Arc::new(MemorySecureStore::new()),
            key_value_store: Arc::new(MemoryKeyValueStore::new()),
        }
    }
}

impl PlatformProvider for TestPlatform {
    fn secure_store(&self) -> Arc<dyn SecureStore> {
        self.secure_store.clone()
    }

    fn key_value_store(&self) -> Arc<dyn KeyValueStore> {
        self.key_value_store.clone()
    }

    fn attestation_service(&self) -> Arc<dyn AttestationService> {
        Arc::new(UnsupportedAttestation)
    }

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            platform: "ios".to_string(),
            os_version: "17.4".to_string(),
            device_model: "iPhone15,2".to_string(),
        }
    }
}

/// Configuration pointing at [`API_URL`].
pub fn config() -> CutieConfig {
    CutieConfig::new("app_integration", API_URL)
}

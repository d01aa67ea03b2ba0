//! Per-installation device identifier.

use crate::platform::KeyValueStore;

/// Key under which the device id is kept in the local key-value store.
pub const DEVICE_ID_KEY: &str = "cutie.device_id";

/// Random identifier generated once per installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    device_id: String,
}

impl DeviceIdentity {
    /// Loads the persisted device id, generating and persisting a new one if
    /// none is stored.
    ///
    /// Never fails: a store that cannot be read or written yields a fresh id
    /// for this process.
    #[must_use]
    pub fn load_or_create(store: &dyn KeyValueStore) -> Self {
        match store.get_string(DEVICE_ID_KEY.to_string()) {
            Ok(Some(existing)) if !existing.trim().is_empty() => {
                return Self {
                    device_id: existing,
                };
            }
            Ok(_) => {}
            Err(e) => log::warn!("Failed to read device id, generating a new one: {e}"),
        }

        let device_id = uuid::Uuid::new_v4().to_string().to_uppercase();
        if let Err(e) = store.set_string(DEVICE_ID_KEY.to_string(), device_id.clone()) {
            log::error!("Failed to persist device id: {e}");
        } else {
            log::info!("Generated new device id");
        }
        Self { device_id }
    }

    /// The identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.device_id
    }

    /// Consumes the identity, returning the identifier string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.device_id
    }
}

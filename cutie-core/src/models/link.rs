use serde::{Deserialize, Serialize};

use super::{LinkTokenStatus, SubscriptionTier};

/// A freshly issued device-linking token, to be shown (usually as a QR code)
/// on the device that initiates the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct LinkInitiation {
    /// Single-use token the second device confirms.
    pub link_token: String,
    /// Expiry time, RFC 3339.
    pub expires_at: String,
    /// Deep link encoding the token, if the backend provides one.
    #[serde(default)]
    pub link_url: Option<String>,
}

/// Outcome of confirming a link token on the second device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct LinkConfirmation {
    /// Whether the devices are now linked.
    pub success: bool,
    /// Device the token was issued to.
    #[serde(default)]
    pub linked_device_id: Option<String>,
    /// Tier shared by the linked devices.
    #[serde(default)]
    pub subscription_tier: Option<SubscriptionTier>,
}

/// State of a link token as seen by the initiating device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct LinkStatus {
    /// Lifecycle state of the token.
    pub status: LinkTokenStatus,
    /// Device that confirmed the token, once confirmed.
    #[serde(default)]
    pub linked_device_id: Option<String>,
}

/// A device linked to this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct LinkedDevice {
    /// Device identifier of the linked installation.
    pub device_id: String,
    /// User-visible device name.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Platform reported at registration (`ios`, `macos`, ...).
    #[serde(default)]
    pub platform: Option<String>,
    /// When the link was confirmed, RFC 3339.
    pub linked_at: String,
    /// Whether this entry is the calling device.
    #[serde(default)]
    pub is_current: bool,
}

/// Response of `GET /v1/sdk/link/devices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct LinkedDevices {
    /// All devices in the link group, this one included.
    pub devices: Vec<LinkedDevice>,
    /// Tier shared by the linked devices.
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
}

#[derive(Debug, Serialize)]
pub(crate) struct LinkConfirmRequest<'a> {
    pub link_token: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_linked_devices_default_tier() {
        let devices: LinkedDevices = serde_json::from_value(json!({
            "devices": [
                { "device_id": "A", "linked_at": "2024-05-01T10:00:00Z", "is_current": true },
                { "device_id": "B", "device_name": "iPad", "linked_at": "2024-05-02T10:00:00Z" },
            ]
        }))
        .unwrap();

        assert_eq!(devices.subscription_tier, SubscriptionTier::Free);
        assert_eq!(devices.devices.len(), 2);
        assert!(devices.devices[0].is_current);
        assert_eq!(devices.devices[1].device_name.as_deref(), Some("iPad"));
    }

    #[test]
    fn test_link_status() {
        let status: LinkStatus =
            serde_json::from_value(json!({ "status": "confirmed", "linked_device_id": "B" }))
                .unwrap();
        assert_eq!(status.status, LinkTokenStatus::Confirmed);
    }
}

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/device/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DeviceRegistration {
    pub device_id: String,
    pub app_id: String,
    pub platform: String,
    pub os_version: String,
    pub device_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_build: Option<String>,
    pub sdk_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Response of `POST /v1/device/register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct DeviceRegistrationResponse {
    pub device_token: String,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub is_new: bool,
}

/// Body of `POST /v1/notifications/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PushRegistration<'a> {
    pub token: &'a str,
    pub platform: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

/// Body of `DELETE /v1/notifications/unregister`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PushUnregistration<'a> {
    pub token: &'a str,
}

/// Body of `POST /v1/activity/ping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ActivityPing {
    pub app_id: String,
    pub device_id: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    pub sdk_version: &'static str,
}

/// Response of `POST /v1/device/attest/challenge`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct AttestationChallenge {
    pub challenge: String,
}

/// Body of `POST /v1/device/attest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AttestationSubmission<'a> {
    pub key_id: &'a str,
    pub attestation: String,
    pub challenge: &'a str,
}

/// Response of `POST /v1/device/attest`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct AttestationVerdict {
    pub verified: bool,
}

/// Body of `POST /v1/device/attest/assert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AssertionSubmission<'a> {
    pub key_id: &'a str,
    pub assertion: &'a str,
    pub client_data: String,
}

/// Response of `POST /v1/device/attest/assert`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct AssertionVerdict {
    pub valid: bool,
}

/// Backend view of this device's attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct AttestationStatus {
    /// Whether the backend holds a verified attestation for this device.
    pub attested: bool,
    /// Key id the backend verified, if any.
    #[serde(default)]
    pub key_id: Option<String>,
    /// When the attestation was verified, RFC 3339.
    #[serde(default)]
    pub attested_at: Option<String>,
}

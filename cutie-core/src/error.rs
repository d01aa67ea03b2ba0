use thiserror::Error;

/// Result type for SDK operations.
pub type CutieResult<T, E = CutieError> = std::result::Result<T, E>;

/// Error outputs from the CutiE SDK.
#[derive(Debug, Error, uniffi::Error)]
pub enum CutieError {
    /// The SDK has not been configured yet.
    #[error("not_configured: call `configure_shared` before using the shared instance")]
    NotConfigured,
    /// The legacy API key provided at configuration is not usable.
    #[error("invalid_api_key")]
    InvalidApiKey,
    /// The request could not reach the server (connectivity, DNS, TLS or pinning rejection, timeout).
    #[error("network_error: {error}")]
    NetworkError {
        /// Description of the underlying transport failure.
        error: String,
    },
    /// The server answered with an HTTP status of 400 or above.
    #[error("server_error ({status}): {reason}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Message from the `{"error": "..."}` body, or `Unknown error`.
        reason: String,
    },
    /// The response body did not match the expected JSON shape.
    #[error("decoding_error{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    DecodingError {
        /// Optional decoder diagnostic.
        detail: Option<String>,
    },
    /// The request could not be built.
    #[error("invalid_request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected before being sent.
        reason: String,
    },
    /// The push token failed validation.
    #[error("invalid_push_token: {reason}")]
    InvalidPushToken {
        /// Which validation rule failed.
        reason: String,
    },
}

impl CutieError {
    /// Returns the HTTP status for `ServerError`, `None` otherwise.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CutieError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::DecodingError {
                detail: Some(error.to_string()),
            };
        }
        Self::NetworkError {
            error: format_error_chain(&error),
        }
    }
}

impl From<serde_json::Error> for CutieError {
    fn from(error: serde_json::Error) -> Self {
        Self::DecodingError {
            detail: Some(error.to_string()),
        }
    }
}

/// Errors raised by the optional device attestation flow.
#[derive(Debug, Error, uniffi::Error)]
pub enum AttestationError {
    /// The hardware or OS cannot attest keys.
    #[error("attestation_not_supported")]
    NotSupported,
    /// An assertion was requested before attestation completed.
    #[error("not_attested")]
    NotAttested,
    /// The client data hash could not be computed.
    #[error("hashing_failed")]
    HashingFailed,
    /// The platform refused to generate a hardware key.
    #[error("key_generation_failed")]
    KeyGenerationFailed,
    /// The platform or the backend rejected the attestation.
    #[error("attestation_failed: {error}")]
    AttestationFailed {
        /// Underlying failure.
        error: String,
    },
    /// The platform could not sign the assertion.
    #[error("assertion_failed: {error}")]
    AssertionFailed {
        /// Underlying failure.
        error: String,
    },
    /// The attestation backend returned an error.
    #[error("attestation_server_error: {reason}")]
    ServerError {
        /// Message describing the backend failure.
        reason: String,
    },
}

impl From<CutieError> for AttestationError {
    fn from(error: CutieError) -> Self {
        Self::ServerError {
            reason: error.to_string(),
        }
    }
}

/// Result type for platform storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by platform storage implementations.
#[derive(Debug, Error, uniffi::Error)]
pub enum StorageError {
    /// Errors coming from the secure store (Keychain or equivalent).
    #[error("secure store error: {0}")]
    SecureStore(String),

    /// Errors coming from the local key-value store.
    #[error("key value store error: {0}")]
    KeyValueStore(String),

    /// Stored bytes could not be interpreted.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StorageError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}

/// Errors raised by platform security services (App Attest or equivalent).
#[derive(Debug, Error, uniffi::Error)]
pub enum PlatformError {
    /// The platform service reported a failure.
    #[error("platform service failed: {0}")]
    Failed(String),

    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for PlatformError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}

/// Flattens an error and its sources into one line. `reqwest` hides the rustls
/// rejection reason behind two levels of `source()`.
fn format_error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

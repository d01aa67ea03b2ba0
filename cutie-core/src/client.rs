//! Authenticated request pipeline.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attestation::AttestationManager;
use crate::config::Configuration;
use crate::device_token::DeviceTokenManager;
use crate::error::{CutieError, CutieResult};
use crate::http_request::Request;
use crate::models::ActivityPing;
use crate::platform::{DeviceInfo, PlatformProvider};
use crate::SDK_VERSION;

/// SDK version header.
pub const HEADER_SDK_VERSION: &str = "X-CutiE-SDK-Version";
/// Application id header.
pub const HEADER_APP_ID: &str = "X-App-ID";
/// Device id header.
pub const HEADER_DEVICE_ID: &str = "X-Device-ID";
/// Device token header, attached once registered.
pub const HEADER_DEVICE_TOKEN: &str = "X-Device-Token";
/// Legacy API key header.
pub const HEADER_API_KEY: &str = "X-API-Key";
/// Attestation assertion header.
pub const HEADER_APP_ASSERTION: &str = "X-App-Assertion";

const UNKNOWN_ERROR: &str = "Unknown error";

/// Sends requests to the CutiE API with identity, token and assertion headers,
/// and classifies the outcome into [`CutieError`].
pub struct ApiClient {
    config: Arc<Configuration>,
    request: Request,
    tokens: DeviceTokenManager,
    attestation: AttestationManager,
    device: DeviceInfo,
}

impl ApiClient {
    /// Builds the pipeline over an HTTP client from
    /// [`crate::pinning::build_pinned_client`].
    #[must_use]
    pub fn new(
        config: Arc<Configuration>,
        http: reqwest::Client,
        platform: &dyn PlatformProvider,
    ) -> Self {
        let secure_store = platform.secure_store();
        Self {
            tokens: DeviceTokenManager::new(
                Arc::clone(&secure_store),
                config.app_id(),
                config.device_id(),
            ),
            attestation: AttestationManager::new(platform.attestation_service(), secure_store),
            request: Request::new(http),
            device: platform.device_info(),
            config,
        }
    }

    /// Shared configuration.
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Device token lifecycle.
    #[must_use]
    pub const fn tokens(&self) -> &DeviceTokenManager {
        &self.tokens
    }

    /// Attestation manager.
    #[must_use]
    pub const fn attestation(&self) -> &AttestationManager {
        &self.attestation
    }

    /// Platform description sent at registration.
    #[must_use]
    pub const fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// Sends a request and decodes the JSON response into `T`.
    ///
    /// # Errors
    ///
    /// `NetworkError`, `ServerError`, `DecodingError` or `InvalidRequest`.
    pub async fn perform<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> CutieResult<T> {
        let response = self.send(method, endpoint, body).await?;
        decode_response(response).await
    }

    /// Sends a request whose response body is ignored.
    ///
    /// # Errors
    ///
    /// `NetworkError`, `ServerError` or `InvalidRequest`.
    pub async fn perform_unit(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> CutieResult<()> {
        let response = self.send(method, endpoint, body).await?;
        ensure_success(response).await
    }

    /// Fire-and-forget `POST /v1/activity/ping`. Never registers, never
    /// decodes, never fails.
    pub async fn send_activity_ping(&self) {
        let metadata = self.config.metadata();
        let ping = ActivityPing {
            app_id: self.config.app_id().to_string(),
            device_id: self.config.device_id().to_string(),
            platform: self.device.platform.clone(),
            app_version: metadata.app_version,
            sdk_version: SDK_VERSION,
        };

        let Ok(url) = self.config.endpoint("/v1/activity/ping") else {
            return;
        };
        let mut builder =
            with_identity_headers(self.request.req(Method::POST, url), &self.config).json(&ping);
        if let Some(token) = self.tokens.current_token() {
            builder = builder.header(HEADER_DEVICE_TOKEN, token);
        }

        match self.request.handle(builder).await {
            Ok(response) => log::debug!("Activity ping answered {}", response.status()),
            Err(e) => log::debug!("Activity ping failed: {e}"),
        }
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> CutieResult<Response> {
        let url = self.config.endpoint(endpoint)?;

        // Registration completes (or fails) before this request's headers are final.
        let token = self
            .tokens
            .ensure_token(&self.request, &self.config, &self.device)
            .await;

        let mut builder = with_identity_headers(self.request.req(method.clone(), url), &self.config);
        if let Some(token) = &token {
            builder = builder.header(HEADER_DEVICE_TOKEN, token);
        }
        if let Some(assertion) = self.assertion(&method, endpoint, body) {
            builder = builder.header(HEADER_APP_ASSERTION, assertion);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.request.handle(builder).await?;
        if response.status() == StatusCode::UNAUTHORIZED && token.is_some() {
            log::warn!("Device token rejected on {endpoint}, clearing it");
            self.tokens.invalidate();
        }
        Ok(response)
    }

    /// Assertion over `"{method} {endpoint}"` followed by the JSON body, when
    /// attestation is enabled and the device is attested.
    fn assertion(&self, method: &Method, endpoint: &str, body: Option<&Value>) -> Option<String> {
        if !self.config.use_attestation() {
            return None;
        }
        let payload = assertion_payload(method, endpoint, body);
        match self.attestation.generate_assertion(&payload) {
            Ok(assertion) => Some(assertion),
            Err(e) => {
                log::debug!("No assertion for {endpoint}: {e}");
                None
            }
        }
    }
}

fn assertion_payload(method: &Method, endpoint: &str, body: Option<&Value>) -> Vec<u8> {
    let mut payload = format!("{method} {endpoint}").into_bytes();
    if let Some(body) = body {
        payload.extend_from_slice(body.to_string().as_bytes());
    }
    payload
}

/// Attaches the headers every request carries.
pub(crate) fn with_identity_headers(
    builder: RequestBuilder,
    config: &Configuration,
) -> RequestBuilder {
    let builder = builder
        .header(CONTENT_TYPE, "application/json")
        .header(HEADER_SDK_VERSION, SDK_VERSION)
        .header(HEADER_APP_ID, config.app_id())
        .header(HEADER_DEVICE_ID, config.device_id());
    match config.legacy_api_key() {
        Some(key) => builder.header(HEADER_API_KEY, key),
        None => builder,
    }
}

/// Serializes a request body.
pub(crate) fn to_body<T: Serialize>(body: &T) -> CutieResult<Value> {
    serde_json::to_value(body).map_err(|e| CutieError::InvalidRequest {
        reason: format!("failed to serialize request body: {e}"),
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

fn server_error(status: StatusCode, body: &[u8]) -> CutieError {
    let reason = serde_json::from_slice::<ErrorBody>(body)
        .map_or_else(|_| UNKNOWN_ERROR.to_string(), |b| b.error);
    CutieError::ServerError {
        status: status.as_u16(),
        reason,
    }
}

/// Classifies `response` and decodes its body into `T`.
pub(crate) async fn decode_response<T: DeserializeOwned>(response: Response) -> CutieResult<T> {
    let status = response.status();
    let body = response.bytes().await?;
    if status.as_u16() >= 400 {
        return Err(server_error(status, &body));
    }
    serde_json::from_slice(&body).map_err(|e| {
        log::debug!(
            "Failed to decode {}: {e}; body: {}",
            std::any::type_name::<T>(),
            String::from_utf8_lossy(&body)
        );
        e.into()
    })
}

/// Classifies `response`, ignoring its body on success.
pub(crate) async fn ensure_success(response: Response) -> CutieResult<()> {
    let status = response.status();
    if status.as_u16() < 400 {
        return Ok(());
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(server_error(status, &body))
}

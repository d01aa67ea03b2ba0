//! SDK configuration.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::Url;

use crate::error::{CutieError, CutieResult};

/// Default budget for establishing a connection.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default budget for a whole request, including the response body.
pub const DEFAULT_RESOURCE_TIMEOUT: Duration = Duration::from_secs(60);

/// Values the host app passes when configuring the SDK.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct CutieConfig {
    /// Application identifier issued by the CutiE dashboard.
    pub app_id: String,
    /// Base URL of the CutiE API, e.g. `https://api.cuti-e.com`.
    pub api_url: String,
    /// Identifier of the signed-in user, if the app has one.
    pub user_id: Option<String>,
    /// Marketing version of the host app.
    pub app_version: Option<String>,
    /// Build number of the host app.
    pub app_build: Option<String>,
    /// Sign requests with App Attest assertions once the device is attested.
    pub use_attestation: bool,
    /// Legacy API key, sent as `X-API-Key` for backends that predate device tokens.
    pub legacy_api_key: Option<String>,
}

impl CutieConfig {
    /// Minimal configuration: no user, no metadata, no attestation, no legacy key.
    #[must_use]
    pub fn new(app_id: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_url: api_url.into(),
            user_id: None,
            app_version: None,
            app_build: None,
            use_attestation: false,
            legacy_api_key: None,
        }
    }
}

/// Transport tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct SdkOptions {
    /// Connection establishment budget.
    pub request_timeout: Duration,
    /// Whole-request budget.
    pub resource_timeout: Duration,
}

impl Default for SdkOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            resource_timeout: DEFAULT_RESOURCE_TIMEOUT,
        }
    }
}

/// Mutable app/user metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppMetadata {
    /// Identifier of the signed-in user.
    pub user_id: Option<String>,
    /// Marketing version of the host app.
    pub app_version: Option<String>,
    /// Build number of the host app.
    pub app_build: Option<String>,
}

/// Validated, process-lifetime configuration.
///
/// `device_id`, `app_id` and `api_url` never change after creation.
#[derive(Debug)]
pub struct Configuration {
    device_id: String,
    app_id: String,
    api_url: Url,
    legacy_api_key: Option<String>,
    use_attestation: bool,
    metadata: RwLock<AppMetadata>,
}

impl Configuration {
    /// Validates `config` and binds it to `device_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the app id is blank or the API URL is not a valid https URL.
    /// - `InvalidApiKey` if a legacy key is given but cannot be sent as a header.
    pub fn new(config: CutieConfig, device_id: String) -> CutieResult<Self> {
        let app_id = config.app_id.trim().to_string();
        if app_id.is_empty() {
            return Err(CutieError::InvalidRequest {
                reason: "app_id must not be empty".to_string(),
            });
        }

        let api_url = parse_api_url(&config.api_url)?;

        let legacy_api_key = match config.legacy_api_key {
            Some(key) if !is_valid_api_key(&key) => return Err(CutieError::InvalidApiKey),
            other => other,
        };

        Ok(Self {
            device_id,
            app_id,
            api_url,
            legacy_api_key,
            use_attestation: config.use_attestation,
            metadata: RwLock::new(AppMetadata {
                user_id: config.user_id,
                app_version: config.app_version,
                app_build: config.app_build,
            }),
        })
    }

    /// Installation identifier.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Application identifier.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// API base URL.
    #[must_use]
    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Legacy API key, if configured.
    #[must_use]
    pub fn legacy_api_key(&self) -> Option<&str> {
        self.legacy_api_key.as_deref()
    }

    /// Whether requests should carry attestation assertions.
    #[must_use]
    pub const fn use_attestation(&self) -> bool {
        self.use_attestation
    }

    /// Snapshot of the mutable metadata.
    #[must_use]
    pub fn metadata(&self) -> AppMetadata {
        self.metadata
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the signed-in user.
    pub fn set_user_id(&self, user_id: Option<String>) {
        self.metadata
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id = user_id;
    }

    /// Replaces the app version.
    pub fn set_app_version(&self, app_version: Option<String>) {
        self.metadata
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .app_version = app_version;
    }

    /// Replaces the app build.
    pub fn set_app_build(&self, app_build: Option<String>) {
        self.metadata
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .app_build = app_build;
    }

    /// Resolves `endpoint` (e.g. `/v1/conversations`) against the base URL,
    /// keeping any path prefix the base URL carries.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the endpoint is not an absolute path.
    pub fn endpoint(&self, endpoint: &str) -> CutieResult<Url> {
        if !endpoint.starts_with('/') || endpoint.contains(['?', '#']) {
            return Err(CutieError::InvalidRequest {
                reason: format!("invalid endpoint `{endpoint}`"),
            });
        }
        let mut url = self.api_url.clone();
        let path = format!("{}{endpoint}", self.api_url.path().trim_end_matches('/'));
        url.set_path(&path);
        Ok(url)
    }
}

fn parse_api_url(raw: &str) -> CutieResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| CutieError::InvalidRequest {
        reason: format!("invalid api_url: {e}"),
    })?;

    let scheme_allowed = url.scheme() == "https" || (cfg!(test) && url.scheme() == "http");
    if !scheme_allowed || url.host_str().is_none() {
        return Err(CutieError::InvalidRequest {
            reason: format!("api_url must be an https URL, got `{raw}`"),
        });
    }
    Ok(url)
}

fn is_valid_api_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_graphic())
}

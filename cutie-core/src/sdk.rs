//! The `Cutie` facade exported to Swift and Kotlin.

use std::sync::{Arc, OnceLock};

use crate::api::{conversations, link, notifications};
use crate::attestation::AttestationState;
use crate::client::ApiClient;
use crate::config::{Configuration, CutieConfig, SdkOptions};
use crate::device_token::TokenState;
use crate::error::{AttestationError, CutieError, CutieResult, StorageError};
use crate::identity::DeviceIdentity;
use crate::models::{
    AttestationStatus, Conversation, LinkConfirmation, LinkInitiation, LinkStatus, LinkedDevices,
    Message, NewConversation,
};
use crate::pinning::{build_pinned_client, PinningGuard};
use crate::platform::{KeyValueStore, PlatformProvider};

/// Key-value store key holding the analytics consent flag.
pub const ANALYTICS_CONSENT_KEY: &str = "cutie.analytics_consent";

static SHARED: OnceLock<Arc<Cutie>> = OnceLock::new();

/// A configured SDK instance.
///
/// Apps usually hold one, either directly or through [`configure_shared`].
#[derive(uniffi::Object)]
pub struct Cutie {
    client: ApiClient,
    config: Arc<Configuration>,
    guard: Arc<PinningGuard>,
    preferences: Arc<dyn KeyValueStore>,
}

#[uniffi::export(async_runtime = "tokio")]
impl Cutie {
    /// Configures an instance with default transport options.
    ///
    /// # Errors
    ///
    /// Configuration validation errors (`InvalidRequest`, `InvalidApiKey`).
    #[uniffi::constructor]
    pub fn new(config: CutieConfig, platform: Arc<dyn PlatformProvider>) -> CutieResult<Arc<Self>> {
        Self::with_options(config, SdkOptions::default(), platform)
    }

    /// Configures an instance with explicit transport options.
    ///
    /// # Errors
    ///
    /// Configuration validation errors (`InvalidRequest`, `InvalidApiKey`).
    #[uniffi::constructor]
    pub fn with_options(
        config: CutieConfig,
        options: SdkOptions,
        platform: Arc<dyn PlatformProvider>,
    ) -> CutieResult<Arc<Self>> {
        let preferences = platform.key_value_store();
        let device_id = DeviceIdentity::load_or_create(preferences.as_ref()).into_string();
        let config = Arc::new(Configuration::new(config, device_id)?);

        let guard = Arc::new(PinningGuard::default());
        guard.check_expiry();
        let http = build_pinned_client(
            Arc::clone(&guard),
            options.request_timeout,
            options.resource_timeout,
        )?;

        log::info!(
            "CutiE configured for app {} against {}",
            config.app_id(),
            config.api_url()
        );
        Ok(Arc::new(Self {
            client: ApiClient::new(Arc::clone(&config), http, platform.as_ref()),
            config,
            guard,
            preferences,
        }))
    }

    /// Installation identifier.
    #[must_use]
    pub fn device_id(&self) -> String {
        self.config.device_id().to_string()
    }

    /// Sets or clears the signed-in user.
    pub fn set_user_id(&self, user_id: Option<String>) {
        self.config.set_user_id(user_id);
    }

    /// Sets or clears the host app version.
    pub fn set_app_version(&self, app_version: Option<String>) {
        self.config.set_app_version(app_version);
    }

    /// Sets or clears the host app build number.
    pub fn set_app_build(&self, app_build: Option<String>) {
        self.config.set_app_build(app_build);
    }

    /// Records whether the user agreed to anonymous usage analytics.
    ///
    /// # Errors
    ///
    /// Storage errors from the key-value store.
    pub fn set_analytics_consent(&self, granted: bool) -> Result<(), StorageError> {
        self.preferences
            .set_string(ANALYTICS_CONSENT_KEY.to_string(), granted.to_string())
    }

    /// Whether analytics consent was granted. Defaults to `false`.
    #[must_use]
    pub fn analytics_consent(&self) -> bool {
        match self.preferences.get_string(ANALYTICS_CONSENT_KEY.to_string()) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                log::warn!("Failed to read analytics consent: {e}");
                false
            }
        }
    }

    /// Opens a support conversation.
    ///
    /// # Errors
    ///
    /// See [`conversations::create`].
    pub async fn create_conversation(
        &self,
        conversation: NewConversation,
    ) -> CutieResult<Conversation> {
        conversations::create(&self.client, &conversation).await
    }

    /// Lists this device's conversations.
    ///
    /// # Errors
    ///
    /// See [`conversations::list`].
    pub async fn list_conversations(&self) -> CutieResult<Vec<Conversation>> {
        conversations::list(&self.client).await
    }

    /// Fetches one conversation with its messages.
    ///
    /// # Errors
    ///
    /// See [`conversations::get`].
    pub async fn get_conversation(&self, conversation_id: String) -> CutieResult<Conversation> {
        conversations::get(&self.client, &conversation_id).await
    }

    /// Posts a message to a conversation.
    ///
    /// # Errors
    ///
    /// See [`conversations::send_message`].
    pub async fn send_message(
        &self,
        conversation_id: String,
        text: String,
    ) -> CutieResult<Message> {
        conversations::send_message(&self.client, &conversation_id, &text).await
    }

    /// Marks every message in a conversation as read.
    ///
    /// # Errors
    ///
    /// See [`conversations::mark_all_read`].
    pub async fn mark_all_read(&self, conversation_id: String) -> CutieResult<()> {
        conversations::mark_all_read(&self.client, &conversation_id).await
    }

    /// Registers a hex-encoded push token.
    ///
    /// # Errors
    ///
    /// See [`notifications::register`].
    pub async fn register_push_token(&self, push_token: String) -> CutieResult<()> {
        notifications::register(&self.client, &push_token).await
    }

    /// Unregisters a push token.
    ///
    /// # Errors
    ///
    /// See [`notifications::unregister`].
    pub async fn unregister_push_token(&self, push_token: String) -> CutieResult<()> {
        notifications::unregister(&self.client, &push_token).await
    }

    /// Issues a link token to show on this device.
    ///
    /// # Errors
    ///
    /// See [`link::initiate`].
    pub async fn initiate_link(&self) -> CutieResult<LinkInitiation> {
        link::initiate(&self.client).await
    }

    /// Confirms a link token shown on another device.
    ///
    /// # Errors
    ///
    /// See [`link::confirm`].
    pub async fn confirm_link(&self, link_token: String) -> CutieResult<LinkConfirmation> {
        link::confirm(&self.client, &link_token).await
    }

    /// Polls a link token issued by this device.
    ///
    /// # Errors
    ///
    /// See [`link::status`].
    pub async fn link_status(&self, link_token: String) -> CutieResult<LinkStatus> {
        link::status(&self.client, &link_token).await
    }

    /// Lists linked devices and their shared subscription tier.
    ///
    /// # Errors
    ///
    /// See [`link::devices`].
    pub async fn linked_devices(&self) -> CutieResult<LinkedDevices> {
        link::devices(&self.client).await
    }

    /// Unlinks a device.
    ///
    /// # Errors
    ///
    /// See [`link::remove`].
    pub async fn remove_linked_device(&self, device_id: String) -> CutieResult<()> {
        link::remove(&self.client, &device_id).await
    }

    /// Attests this installation's hardware key with the backend.
    ///
    /// # Errors
    ///
    /// See [`crate::attestation::AttestationManager::perform_attestation`].
    pub async fn perform_attestation(&self) -> Result<(), AttestationError> {
        self.client
            .attestation()
            .perform_attestation(&self.client)
            .await
    }

    /// Backend view of this device's attestation.
    ///
    /// # Errors
    ///
    /// `ServerError` for transport and HTTP errors.
    pub async fn attestation_status(&self) -> Result<AttestationStatus, AttestationError> {
        self.client.attestation().status(&self.client).await
    }

    /// Asks the backend to verify an assertion over `data`.
    ///
    /// # Errors
    ///
    /// Assertion errors, or `ServerError` for transport and HTTP errors.
    pub async fn verify_assertion(&self, data: Vec<u8>) -> Result<bool, AttestationError> {
        self.client
            .attestation()
            .verify_assertion(&self.client, &data)
            .await
    }

    /// Revokes the attestation on the backend and locally.
    ///
    /// # Errors
    ///
    /// `ServerError` for transport and HTTP errors.
    pub async fn revoke_attestation(&self) -> Result<(), AttestationError> {
        self.client.attestation().revoke(&self.client).await
    }

    /// Discards the local key handle. No network.
    pub fn reset_attestation(&self) {
        self.client.attestation().reset();
    }

    /// Whether the device is attested locally.
    #[must_use]
    pub fn is_attested(&self) -> bool {
        self.client.attestation().is_attested()
    }

    /// Local attestation state.
    #[must_use]
    pub fn attestation_state(&self) -> AttestationState {
        self.client.attestation().state()
    }

    /// Sends an anonymous activity ping if analytics consent was granted.
    /// Never fails.
    pub async fn track_activity(&self) {
        if !self.analytics_consent() {
            log::debug!("Skipping activity ping: no analytics consent");
            return;
        }
        self.client.send_activity_ping().await;
    }

    /// Days until the compiled pin set expires. Negative once expired.
    #[must_use]
    pub fn certificate_days_until_expiry(&self) -> i64 {
        self.guard.days_until_expiry()
    }

    /// Device token state.
    #[must_use]
    pub fn token_state(&self) -> TokenState {
        self.client.tokens().state()
    }

    /// Forgets the device token; the next request registers again.
    pub fn reset_device_token(&self) {
        self.client.tokens().reset();
    }
}

/// Configures the process-wide instance. A second call logs and returns the
/// existing instance unchanged.
///
/// # Errors
///
/// Configuration validation errors on the first call.
#[uniffi::export]
pub fn configure_shared(
    config: CutieConfig,
    platform: Arc<dyn PlatformProvider>,
) -> CutieResult<Arc<Cutie>> {
    if let Some(existing) = SHARED.get() {
        log::warn!("CutiE is already configured; keeping the existing instance");
        return Ok(Arc::clone(existing));
    }
    let instance = Cutie::new(config, platform)?;
    match SHARED.set(Arc::clone(&instance)) {
        Ok(()) => Ok(instance),
        // Lost a race with another configure call.
        Err(_) => shared(),
    }
}

/// The process-wide instance.
///
/// # Errors
///
/// `NotConfigured` before [`configure_shared`] succeeds.
#[uniffi::export]
pub fn shared() -> CutieResult<Arc<Cutie>> {
    SHARED.get().cloned().ok_or(CutieError::NotConfigured)
}

//! Push notification registration.

use reqwest::Method;

use crate::client::{to_body, ApiClient};
use crate::error::CutieResult;
use crate::models::{PushRegistration, PushUnregistration};
use crate::push::validate_push_token;

/// `POST /v1/notifications/register`. The token is validated before any
/// network traffic.
///
/// # Errors
///
/// `InvalidPushToken` for a malformed token; otherwise the classified request error.
pub async fn register(client: &ApiClient, push_token: &str) -> CutieResult<()> {
    validate_push_token(push_token)?;
    let body = to_body(&PushRegistration {
        token: push_token,
        platform: &client.device().platform,
        app_version: client.config().metadata().app_version,
    })?;
    client
        .perform_unit(Method::POST, "/v1/notifications/register", Some(&body))
        .await?;
    log::info!("Push token registered");
    Ok(())
}

/// `DELETE /v1/notifications/unregister`.
///
/// # Errors
///
/// `InvalidPushToken` for a malformed token; otherwise the classified request error.
pub async fn unregister(client: &ApiClient, push_token: &str) -> CutieResult<()> {
    validate_push_token(push_token)?;
    let body = to_body(&PushUnregistration { token: push_token })?;
    client
        .perform_unit(Method::DELETE, "/v1/notifications/unregister", Some(&body))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{client, mock_registration};
    use crate::error::CutieError;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const TOKEN: &str = "740f4707bebcf74f9b7c25d48e3358945f6aa01da5ddb387462c7eaf61bb78ad";

    #[tokio::test]
    async fn test_register_and_unregister() {
        let mut server = Server::new_async().await;
        let _registration = mock_registration(&mut server).await;
        let register_mock = server
            .mock("POST", "/v1/notifications/register")
            .match_body(Matcher::PartialJson(json!({ "token": TOKEN })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        let unregister_mock = server
            .mock("DELETE", "/v1/notifications/unregister")
            .match_body(Matcher::Json(json!({ "token": TOKEN })))
            .with_status(204)
            .create_async()
            .await;

        let client = client(&server);
        register(&client, TOKEN).await.unwrap();
        unregister(&client, TOKEN).await.unwrap();

        register_mock.assert_async().await;
        unregister_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_token_never_reaches_the_network() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = register(&client(&server), "not-a-token").await.unwrap_err();
        assert!(matches!(err, CutieError::InvalidPushToken { .. }));
        mock.assert_async().await;
    }
}

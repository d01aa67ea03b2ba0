//! Device linking: two installations confirm a short-lived token to share
//! conversations and subscription tier.

use reqwest::Method;

use super::path_segment;
use crate::client::{to_body, ApiClient};
use crate::error::CutieResult;
use crate::models::{LinkConfirmRequest, LinkConfirmation, LinkInitiation, LinkStatus, LinkedDevices};

/// `POST /v1/sdk/link/initiate`: issues a link token for this device.
///
/// # Errors
///
/// The classified request error.
pub async fn initiate(client: &ApiClient) -> CutieResult<LinkInitiation> {
    client
        .perform(Method::POST, "/v1/sdk/link/initiate", None)
        .await
}

/// `POST /v1/sdk/link/confirm`: confirms a token issued on another device.
///
/// # Errors
///
/// `InvalidRequest` for a malformed token; otherwise the classified request error.
pub async fn confirm(client: &ApiClient, link_token: &str) -> CutieResult<LinkConfirmation> {
    let link_token = path_segment("link token", link_token)?;
    let body = to_body(&LinkConfirmRequest { link_token })?;
    client
        .perform(Method::POST, "/v1/sdk/link/confirm", Some(&body))
        .await
}

/// `GET /v1/sdk/link/status/{token}`.
///
/// # Errors
///
/// `InvalidRequest` for a malformed token; otherwise the classified request error.
pub async fn status(client: &ApiClient, link_token: &str) -> CutieResult<LinkStatus> {
    let link_token = path_segment("link token", link_token)?;
    client
        .perform(
            Method::GET,
            &format!("/v1/sdk/link/status/{link_token}"),
            None,
        )
        .await
}

/// `GET /v1/sdk/link/devices`.
///
/// # Errors
///
/// The classified request error.
pub async fn devices(client: &ApiClient) -> CutieResult<LinkedDevices> {
    client
        .perform(Method::GET, "/v1/sdk/link/devices", None)
        .await
}

/// `DELETE /v1/sdk/link/devices/{id}`.
///
/// # Errors
///
/// `InvalidRequest` for a malformed id; otherwise the classified request error.
pub async fn remove(client: &ApiClient, device_id: &str) -> CutieResult<()> {
    let device_id = path_segment("device id", device_id)?;
    client
        .perform_unit(
            Method::DELETE,
            &format!("/v1/sdk/link/devices/{device_id}"),
            None,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{client, mock_registration};
    use crate::models::{LinkTokenStatus, SubscriptionTier};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_link_flow() {
        let mut server = Server::new_async().await;
        let _registration = mock_registration(&mut server).await;
        let _initiate = server
            .mock("POST", "/v1/sdk/link/initiate")
            .with_status(200)
            .with_body(
                json!({ "link_token": "lnk_42", "expires_at": "2024-05-01T10:10:00Z" }).to_string(),
            )
            .create_async()
            .await;
        let _status = server
            .mock("GET", "/v1/sdk/link/status/lnk_42")
            .with_status(200)
            .with_body(json!({ "status": "pending" }).to_string())
            .create_async()
            .await;
        let confirm_mock = server
            .mock("POST", "/v1/sdk/link/confirm")
            .match_body(Matcher::Json(json!({ "link_token": "lnk_42" })))
            .with_status(200)
            .with_body(
                json!({ "success": true, "linked_device_id": "DEVICE-0", "subscription_tier": "pro" })
                    .to_string(),
            )
            .create_async()
            .await;

        let client = client(&server);
        let initiation = initiate(&client).await.unwrap();
        assert_eq!(initiation.link_token, "lnk_42");
        assert_eq!(initiation.link_url, None);

        let pending = status(&client, &initiation.link_token).await.unwrap();
        assert_eq!(pending.status, LinkTokenStatus::Pending);

        let confirmation = confirm(&client, &initiation.link_token).await.unwrap();
        assert!(confirmation.success);
        assert_eq!(confirmation.subscription_tier, Some(SubscriptionTier::Pro));
        confirm_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_devices_and_remove() {
        let mut server = Server::new_async().await;
        let _registration = mock_registration(&mut server).await;
        let _devices = server
            .mock("GET", "/v1/sdk/link/devices")
            .with_status(200)
            .with_body(
                json!({
                    "devices": [{ "device_id": "DEVICE-0", "linked_at": "2024-05-01T10:00:00Z" }],
                    "subscription_tier": "business",
                })
                .to_string(),
            )
            .create_async()
            .await;
        let remove_mock = server
            .mock("DELETE", "/v1/sdk/link/devices/DEVICE-0")
            .with_status(204)
            .create_async()
            .await;

        let client = client(&server);
        let linked = devices(&client).await.unwrap();
        assert_eq!(linked.subscription_tier, SubscriptionTier::Business);
        assert_eq!(linked.devices[0].device_id, "DEVICE-0");

        remove(&client, "DEVICE-0").await.unwrap();
        remove_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_token_is_server_error() {
        let mut server = Server::new_async().await;
        let _registration = mock_registration(&mut server).await;
        let _confirm = server
            .mock("POST", "/v1/sdk/link/confirm")
            .with_status(410)
            .with_body(json!({ "error": "Link token expired" }).to_string())
            .create_async()
            .await;

        let err = confirm(&client(&server), "lnk_old").await.unwrap_err();
        assert_eq!(err.status(), Some(410));
        assert_eq!(err.to_string(), "server_error (410): Link token expired");
    }
}

//! Support conversations.

use reqwest::Method;

use super::path_segment;
use crate::client::{to_body, ApiClient};
use crate::error::{CutieError, CutieResult};
use crate::models::{Conversation, ConversationList, Message, NewConversation, NewMessage};

/// `POST /v1/conversations`: opens a conversation with its first message.
///
/// # Errors
///
/// `InvalidRequest` for a blank message; otherwise the classified request error.
pub async fn create(client: &ApiClient, conversation: &NewConversation) -> CutieResult<Conversation> {
    if conversation.message.trim().is_empty() {
        return Err(CutieError::InvalidRequest {
            reason: "message must not be empty".to_string(),
        });
    }
    let body = to_body(conversation)?;
    client
        .perform(Method::POST, "/v1/conversations", Some(&body))
        .await
}

/// `GET /v1/conversations`: this device's conversations, without messages.
///
/// # Errors
///
/// The classified request error.
pub async fn list(client: &ApiClient) -> CutieResult<Vec<Conversation>> {
    let list: ConversationList = client
        .perform(Method::GET, "/v1/conversations", None)
        .await?;
    Ok(list.conversations)
}

/// `GET /v1/conversations/{id}`: one conversation with its messages.
///
/// # Errors
///
/// `InvalidRequest` for a malformed id; otherwise the classified request error.
pub async fn get(client: &ApiClient, conversation_id: &str) -> CutieResult<Conversation> {
    let id = path_segment("conversation id", conversation_id)?;
    client
        .perform(Method::GET, &format!("/v1/conversations/{id}"), None)
        .await
}

/// `POST /v1/conversations/{id}/messages`: appends a user message.
///
/// # Errors
///
/// `InvalidRequest` for a malformed id or blank text; otherwise the classified request error.
pub async fn send_message(
    client: &ApiClient,
    conversation_id: &str,
    text: &str,
) -> CutieResult<Message> {
    let id = path_segment("conversation id", conversation_id)?;
    if text.trim().is_empty() {
        return Err(CutieError::InvalidRequest {
            reason: "message must not be empty".to_string(),
        });
    }
    let body = to_body(&NewMessage { message: text })?;
    client
        .perform(
            Method::POST,
            &format!("/v1/conversations/{id}/messages"),
            Some(&body),
        )
        .await
}

/// `POST /v1/conversations/{id}/mark-all-read`.
///
/// # Errors
///
/// `InvalidRequest` for a malformed id; otherwise the classified request error.
pub async fn mark_all_read(client: &ApiClient, conversation_id: &str) -> CutieResult<()> {
    let id = path_segment("conversation id", conversation_id)?;
    client
        .perform_unit(
            Method::POST,
            &format!("/v1/conversations/{id}/mark-all-read"),
            None,
        )
        .await
}

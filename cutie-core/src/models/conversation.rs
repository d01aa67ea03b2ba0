use serde::{Deserialize, Serialize};

use super::{ConversationCategory, ConversationPriority, ConversationStatus, SenderType};

/// A support conversation between the app user and the team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct Conversation {
    /// Server-assigned identifier.
    pub id: String,
    /// Optional subject line.
    #[serde(default)]
    pub title: Option<String>,
    /// Current lifecycle state.
    pub status: ConversationStatus,
    /// What the conversation is about.
    pub category: ConversationCategory,
    /// Triage priority.
    #[serde(default)]
    pub priority: ConversationPriority,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Last activity time, RFC 3339.
    pub updated_at: String,
    /// Team messages the user has not read yet.
    #[serde(default)]
    pub unread_count: u32,
    /// Messages, oldest first. Empty in list responses.
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// A single message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct Message {
    /// Server-assigned identifier.
    pub id: String,
    /// Conversation this message belongs to.
    pub conversation_id: String,
    /// Author kind.
    pub sender_type: SenderType,
    /// Display name of a team author.
    #[serde(default)]
    pub sender_name: Option<String>,
    /// Message body.
    #[serde(rename = "message")]
    pub text: String,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

/// Body of `POST /v1/conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Record)]
pub struct NewConversation {
    /// What the feedback is about.
    pub category: ConversationCategory,
    /// First message.
    pub message: String,
    /// Optional subject line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional reply-to address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationList {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewMessage<'a> {
    pub message: &'a str,
}

//! Wire models exchanged with the CutiE API.
//!
//! The closed enums serialize in `snake_case` both through `serde` and through
//! `strum`, so `to_string()` and `from_str()` agree with the JSON form.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

mod conversation;
pub use conversation::*;

mod device;
pub use device::*;

mod link;
pub use link::*;

/// Lifecycle state of a support conversation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    Hash,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Waiting for the support team.
    Open,
    /// A team member is working on it.
    InProgress,
    /// The team replied and is waiting for the user.
    WaitingForUser,
    /// Solved; the user can still reply.
    Resolved,
    /// Closed for good.
    Closed,
}

/// What a piece of feedback is about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    Hash,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationCategory {
    /// Something is broken.
    Bug,
    /// A feature request.
    Feature,
    /// A question for the team.
    Question,
    /// General feedback.
    Feedback,
    /// Anything else.
    Other,
}

/// Triage priority of a conversation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumString,
    Hash,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationPriority {
    /// Can wait.
    Low,
    /// Default for new conversations.
    #[default]
    Normal,
    /// Needs attention soon.
    High,
    /// Blocking the user.
    Urgent,
}

/// Who wrote a message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    Hash,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    /// The app user.
    User,
    /// A member of the support team.
    Admin,
    /// Automated messages (status changes, auto replies).
    System,
}

/// State of a device-linking token.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    Hash,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinkTokenStatus {
    /// Issued, not yet confirmed by the second device.
    Pending,
    /// Confirmed; the devices share an account.
    Confirmed,
    /// The token timed out before confirmation.
    Expired,
}

/// Subscription tier attached to a set of linked devices.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumString,
    Hash,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    /// No subscription.
    #[default]
    Free,
    /// Individual paid tier.
    Pro,
    /// Team tier.
    Business,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use test_case::test_case;

    #[test_case(ConversationStatus::Open, "open")]
    #[test_case(ConversationStatus::InProgress, "in_progress")]
    #[test_case(ConversationStatus::WaitingForUser, "waiting_for_user")]
    #[test_case(ConversationStatus::Resolved, "resolved")]
    #[test_case(ConversationStatus::Closed, "closed")]
    fn test_conversation_status(status: ConversationStatus, wire: &str) {
        assert_eq!(status.to_string(), wire);
        assert_eq!(ConversationStatus::from_str(wire).unwrap(), status);
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{wire}\""));
        assert_eq!(serde_json::from_str::<ConversationStatus>(&json).unwrap(), status);
    }

    #[test]
    fn test_closed_enums_round_trip() {
        for category in [
            ConversationCategory::Bug,
            ConversationCategory::Feature,
            ConversationCategory::Question,
            ConversationCategory::Feedback,
            ConversationCategory::Other,
        ] {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, serde_json::json!(category.to_string()));
            assert_eq!(serde_json::from_value::<ConversationCategory>(json).unwrap(), category);
        }

        for priority in [
            ConversationPriority::Low,
            ConversationPriority::Normal,
            ConversationPriority::High,
            ConversationPriority::Urgent,
        ] {
            let json = serde_json::to_value(priority).unwrap();
            assert_eq!(serde_json::from_value::<ConversationPriority>(json).unwrap(), priority);
            assert_eq!(ConversationPriority::from_str(&priority.to_string()).unwrap(), priority);
        }

        for status in [
            LinkTokenStatus::Pending,
            LinkTokenStatus::Confirmed,
            LinkTokenStatus::Expired,
        ] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(serde_json::from_value::<LinkTokenStatus>(json).unwrap(), status);
            assert_eq!(LinkTokenStatus::from_str(&status.to_string()).unwrap(), status);
        }

        for tier in [
            SubscriptionTier::Free,
            SubscriptionTier::Pro,
            SubscriptionTier::Business,
        ] {
            let json = serde_json::to_value(tier).unwrap();
            assert_eq!(serde_json::from_value::<SubscriptionTier>(json).unwrap(), tier);
            assert_eq!(SubscriptionTier::from_str(&tier.to_string()).unwrap(), tier);
        }
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        assert!(serde_json::from_str::<SubscriptionTier>("\"platinum\"").is_err());
        assert!(ConversationStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(ConversationPriority::Urgent > ConversationPriority::High);
        assert_eq!(ConversationPriority::default(), ConversationPriority::Normal);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StoredMessage;

/// A conversation with its full message history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// Unique identifier for the conversation.
    pub id: Uuid,
    /// The title of the conversation, derived from the first prompt.
    pub title: String,
    /// The model the conversation is pinned to.
    pub model: String,
    /// The messages in this conversation, oldest first.
    pub messages: Vec<StoredMessage>,
    /// Timestamp of the last message in the conversation.
    pub last_updated: DateTime<Utc>,
}

/// A conversation as listed in the sidebar, without message bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub title: String,
    pub model: String,
    pub message_count: i64,
    pub last_updated: DateTime<Utc>,
}

/// Request structure for creating a new conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateConversationRequest {
    /// The model the conversation should use.
    pub model: String,
    /// Optional explicit title; the server derives one otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummary>,
}

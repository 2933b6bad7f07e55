//! Chat request / response types.
//!
//! The message shape is kept compatible with the OpenAI REST API so the
//! sequences received from clients can be forwarded upstream unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// The role of the message author (`"system"`, `"user"`, `"assistant"`).
    pub role: String,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }
}

/// Token counters reported by the upstream provider.
///
/// Both fields are optional: not every provider (or mock) reports usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

/// Request body for `POST /api/super/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuperChatRequest {
    /// Conversation history forwarded to the model.
    pub messages: Vec<ChatMessage>,
    /// Optional identifier of the administrator driving the console;
    /// recorded as the log actor in place of the default `"superadmin"`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub admin_user: Option<String>,
}

/// Request body for `POST /api/chat/user/send`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserChatRequest {
    /// Conversation history forwarded to the model.
    pub messages: Vec<ChatMessage>,
    /// Optional self-reported caller id, recorded as the log actor.
    /// Best-effort only: user routes do not authenticate (see middleware::auth).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
}

/// Response body for both chat routes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    /// First-choice text returned by the model.
    pub reply: String,
    /// Provider token counters, when reported.
    pub usage: Usage,
    /// RFC 3339 timestamp of when the relay produced this reply.
    pub created_at: DateTime<Utc>,
}

//! Interaction-log wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::chat::ChatMessage;

/// One logged chat exchange, as returned by `GET /api/super/logs`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogEntry {
    /// Monotonic row id.
    pub id: i64,
    /// Caller identity: a user id, an `ip:<addr>` pseudonym, or `"superadmin"`.
    pub actor: String,
    /// `"super"` or `"user"`, matching the route tier that produced the entry.
    pub scope: String,
    /// The exact message sequence sent upstream, system prefix included.
    pub messages: Vec<ChatMessage>,
    pub reply: String,
    pub tokens_prompt: Option<i64>,
    pub tokens_completion: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for `GET /api/super/logs`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LogQuery {
    /// Case-insensitive substring matched against the reply or the
    /// serialised message history.
    pub q: Option<String>,
    /// Result cap; defaults to 50, hard-capped at 200.
    pub limit: Option<u32>,
}

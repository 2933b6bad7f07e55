//! Append-only chat exchange log.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::schemas::chat::ChatMessage;
use crate::schemas::logs::LogEntry;

use super::SqliteStore;

/// Hard cap on query results, bounding response size.
pub const MAX_QUERY_LIMIT: u32 = 200;

/// Route tier that produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Super,
    User,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Super => "super",
            Scope::User => "user",
        }
    }
}

/// A log entry about to be appended; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub actor: String,
    pub scope: Scope,
    /// The exact sequence sent upstream, system prefix included.
    pub messages: Vec<ChatMessage>,
    pub reply: String,
    pub tokens_prompt: Option<i64>,
    pub tokens_completion: Option<i64>,
    pub created_at: DateTime<Utc>,
}

pub trait LogStore: Send + Sync + 'static {
    /// Append one entry, returning its assigned id.
    fn append_log(
        &self,
        entry: NewLogEntry,
    ) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;

    /// Most-recent-first query. `filter` is matched case-insensitively as a
    /// substring of the reply or the serialised message history; `limit` is
    /// clamped to [`MAX_QUERY_LIMIT`].
    fn query_logs(
        &self,
        filter: Option<&str>,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<LogEntry>, sqlx::Error>> + Send;
}

impl LogStore for SqliteStore {
    async fn append_log(&self, entry: NewLogEntry) -> Result<i64, sqlx::Error> {
        let messages = serde_json::to_string(&entry.messages)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let created_at = entry.created_at.to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO chat_log (actor, scope, messages, reply, tokens_prompt, tokens_completion, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&entry.actor)
        .bind(entry.scope.as_str())
        .bind(&messages)
        .bind(&entry.reply)
        .bind(entry.tokens_prompt)
        .bind(entry.tokens_completion)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn query_logs(
        &self,
        filter: Option<&str>,
        limit: u32,
    ) -> Result<Vec<LogEntry>, sqlx::Error> {
        let limit = limit.min(MAX_QUERY_LIMIT);
        let needle = filter.map(|f| f.to_lowercase());
        let rows: Vec<(i64, String, String, String, String, Option<i64>, Option<i64>, String)> =
            sqlx::query_as(
                "SELECT id, actor, scope, messages, reply, tokens_prompt, tokens_completion, created_at \
                 FROM chat_log \
                 WHERE ?1 IS NULL OR instr(lower(reply), ?1) > 0 OR instr(lower(messages), ?1) > 0 \
                 ORDER BY id DESC LIMIT ?2",
            )
            .bind(&needle)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, actor, scope, messages, reply, tokens_prompt, tokens_completion, created_at)| {
                    LogEntry {
                        id,
                        actor,
                        scope,
                        messages: serde_json::from_str(&messages).unwrap_or_else(|e| {
                            tracing::warn!(id, error = %e, "failed to parse logged messages");
                            Vec::new()
                        }),
                        reply,
                        tokens_prompt,
                        tokens_completion,
                        created_at: created_at.parse().unwrap_or_else(|e: chrono::ParseError| {
                            tracing::warn!(raw = %created_at, error = %e, "failed to parse log created_at; using now");
                            Utc::now()
                        }),
                    }
                },
            )
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::schemas::settings::{Settings, TtsEngine};
    use crate::entities::SettingsStore;

    fn entry(reply: &str) -> NewLogEntry {
        NewLogEntry {
            actor: "ip:127.0.0.1".into(),
            scope: Scope::User,
            messages: vec![ChatMessage {
                role: "user".into(),
                content: "hi".into(),
            }],
            reply: reply.into(),
            tokens_prompt: Some(3),
            tokens_completion: Some(1),
            created_at: Utc::now(),
        }
    }

    async fn store() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store
            .ensure_settings(&Settings {
                model: "m".into(),
                tts_engine: TtsEngine::Openai,
                tts_voice: "alloy".into(),
                system_prompt: None,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn append_assigns_monotonic_ids() {
        let store = store().await;
        let first = store.append_log(entry("a")).await.unwrap();
        let second = store.append_log(entry("b")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn query_is_most_recent_first_and_capped() {
        let store = store().await;
        for i in 0..5 {
            store.append_log(entry(&format!("reply-{i}"))).await.unwrap();
        }
        let top = store.query_logs(None, 2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].reply, "reply-4");
        assert_eq!(top[1].reply, "reply-3");
    }

    #[tokio::test]
    async fn filter_is_case_insensitive_over_reply_and_messages() {
        let store = store().await;
        store.append_log(entry("The Answer Is 42")).await.unwrap();
        store.append_log(entry("nothing here")).await.unwrap();

        let by_reply = store.query_logs(Some("ANSWER"), 50).await.unwrap();
        assert_eq!(by_reply.len(), 1);
        assert_eq!(by_reply[0].reply, "The Answer Is 42");

        // "hi" appears in every message history.
        let by_messages = store.query_logs(Some("HI"), 50).await.unwrap();
        assert_eq!(by_messages.len(), 2);

        let none = store.query_logs(Some("absent"), 50).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn limit_is_hard_capped() {
        let store = store().await;
        store.append_log(entry("x")).await.unwrap();
        // A huge limit must not be passed through to the query verbatim.
        let rows = store.query_logs(None, u32::MAX).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn messages_round_trip_through_storage() {
        let store = store().await;
        let written = entry("ok");
        store.append_log(written.clone()).await.unwrap();
        let read = store.query_logs(None, 1).await.unwrap();
        assert_eq!(read[0].messages, written.messages);
        assert_eq!(read[0].scope, "user");
        assert_eq!(read[0].tokens_prompt, Some(3));
    }
}

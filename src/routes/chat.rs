//! Shared chat pipeline used by both route tiers.
//!
//! Per request: read settings, prepend the configured system prompt, call
//! the upstream provider once, append a log entry, answer with
//! `{reply, usage, created_at}`. The tiers differ only in guard, rate
//! budget, and how the log actor is derived.

use chrono::Utc;
use tracing::{info, warn};

use crate::entities::{LogStore, NewLogEntry, Scope, SettingsStore};
use crate::error::ServerError;
use crate::schemas::chat::{ChatMessage, ChatReply};
use crate::state::AppState;

/// Sampling temperature forwarded upstream. The relay exposes no per-request
/// override; the conversation shape is the caller's only lever.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Prefix the configured system prompt, when non-empty, as the first message.
/// An empty or whitespace-only prompt is omitted entirely.
pub(crate) fn build_upstream_messages(
    system_prompt: Option<&str>,
    messages: &[ChatMessage],
) -> Vec<ChatMessage> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if let Some(prompt) = system_prompt.map(str::trim).filter(|p| !p.is_empty()) {
        out.push(ChatMessage::system(prompt));
    }
    out.extend_from_slice(messages);
    out
}

pub(crate) async fn run_chat(
    state: &AppState,
    scope: Scope,
    actor: String,
    messages: Vec<ChatMessage>,
) -> Result<ChatReply, ServerError> {
    if messages.is_empty() {
        return Err(ServerError::Validation("messages must not be empty".into()));
    }

    let settings = state.store.get_settings().await?;
    let upstream_messages = build_upstream_messages(settings.system_prompt.as_deref(), &messages);

    let outcome = state
        .upstream
        .complete_chat(&settings.model, &upstream_messages, DEFAULT_TEMPERATURE)
        .await?;
    let created_at = Utc::now();

    info!(
        scope = scope.as_str(),
        model = %settings.model,
        reply_len = outcome.reply.len(),
        "chat exchange completed"
    );

    // A log failure after a successful upstream call must not cost the
    // caller their reply; it is reported through the diagnostic channel only.
    let entry = NewLogEntry {
        actor,
        scope,
        messages: upstream_messages,
        reply: outcome.reply.clone(),
        tokens_prompt: outcome.usage.prompt_tokens.map(i64::from),
        tokens_completion: outcome.usage.completion_tokens.map(i64::from),
        created_at,
    };
    if let Err(e) = state.store.append_log(entry).await {
        warn!(error = %e, "failed to append chat log entry");
    }

    Ok(ChatReply {
        reply: outcome.reply,
        usage: outcome.usage,
        created_at,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! Client interface for the upstream LLM provider.
//!
//! Routes depend on `Arc<dyn Upstream>` so tests can substitute a mock and
//! assert on call counts and forwarded payloads. The production
//! implementation is [`openai::OpenAiClient`].
//!
//! Policy: single attempt, no retry, no backoff, no circuit breaking.
//! A non-success provider response is captured with its status and body so
//! the route layer can forward both verbatim.

pub mod openai;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::schemas::chat::{ChatMessage, Usage};

/// Failure modes of an upstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The provider answered with a non-success HTTP status.
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Transport-level failure: connect, TLS, or body read.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result of a chat-completion call.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Text of the first choice; empty when the provider sent none.
    pub reply: String,
    pub usage: Usage,
}

/// The three operations the relay issues against the provider.
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    /// `POST {base}/chat/completions` with the ordered message sequence.
    async fn complete_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<ChatOutcome, UpstreamError>;

    /// `POST {base}/audio/speech`; returns one MP3 byte stream.
    ///
    /// Callers must check the configured TTS engine first: this must never
    /// be invoked while the engine is client-side-only.
    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Bytes, UpstreamError>;

    /// `POST {base}/audio/transcriptions` as a multipart upload; returns the
    /// provider's transcription JSON untouched.
    async fn transcribe_audio(
        &self,
        audio: Vec<u8>,
        filename: String,
    ) -> Result<serde_json::Value, UpstreamError>;
}

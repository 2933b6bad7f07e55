//! reqwest implementation of [`Upstream`] against an OpenAI-compatible API.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ChatOutcome, Upstream, UpstreamError};
use crate::schemas::chat::{ChatMessage, Usage};

/// Model used for `audio/speech` requests.
const TTS_MODEL: &str = "tts-1";
/// Model used for `audio/transcriptions` requests.
const STT_MODEL: &str = "whisper-1";

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// `base_url` is the provider's v1 root, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Split a response into success / captured-error form.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

// Provider-side response shapes. Only the fields the relay reads.

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn outcome_from(body: CompletionBody) -> ChatOutcome {
    let reply = body
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();
    ChatOutcome {
        reply,
        usage: body.usage,
    }
}

#[async_trait]
impl Upstream for OpenAiClient {
    async fn complete_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<ChatOutcome, UpstreamError> {
        debug!(model, message_count = messages.len(), "upstream chat completion");
        let response = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": model,
                "messages": messages,
                "temperature": temperature,
            }))
            .send()
            .await?;
        let body = Self::check(response).await?.json::<CompletionBody>().await?;
        Ok(outcome_from(body))
    }

    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Bytes, UpstreamError> {
        debug!(voice, text_len = text.len(), "upstream speech synthesis");
        let response = self
            .http
            .post(self.url("audio/speech"))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": TTS_MODEL,
                "input": text,
                "voice": voice,
                "response_format": "mp3",
            }))
            .send()
            .await?;
        Ok(Self::check(response).await?.bytes().await?)
    }

    async fn transcribe_audio(
        &self,
        audio: Vec<u8>,
        filename: String,
    ) -> Result<serde_json::Value, UpstreamError> {
        debug!(filename = %filename, size_bytes = audio.len(), "upstream transcription");
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(filename)
            .mime_str("application/octet-stream")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", STT_MODEL);
        let response = self
            .http
            .post(self.url("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json::<serde_json::Value>().await?)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! Shared TTS / STT flows used by both route tiers.

use axum::extract::Multipart;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::entities::SettingsStore;
use crate::error::ServerError;
use crate::schemas::audio::TtsQuery;
use crate::schemas::settings::TtsEngine;
use crate::state::AppState;

/// Upload cap for transcription audio.
pub(crate) const MAX_AUDIO_BYTES: usize = 20 * 1024 * 1024;

/// Synthesise speech for `text`, honouring the configured engine and voice.
///
/// When the engine is `browser` the request is rejected before the upstream
/// client is ever touched: synthesis is the client's job in that mode.
pub(crate) async fn run_tts(state: &AppState, params: TtsQuery) -> Result<Response, ServerError> {
    let text = params
        .text
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ServerError::Validation("query parameter 'text' is required".into()))?;

    let settings = state.store.get_settings().await?;
    if settings.tts_engine != TtsEngine::Openai {
        return Err(ServerError::Config(
            "speech synthesis is configured as client-side (tts_engine=browser); server TTS is disabled".into(),
        ));
    }

    let voice = params
        .voice
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or(settings.tts_voice);

    let audio = state.upstream.synthesize_speech(&text, &voice).await?;
    debug!(voice = %voice, bytes = audio.len(), "speech synthesised");

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

/// Transcribe the uploaded `audio` multipart field through the provider and
/// return its JSON untouched.
pub(crate) async fn run_stt(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<serde_json::Value, ServerError> {
    let mut upload: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Validation(format!("failed to read multipart field: {e}")))?
    {
        if field.name() != Some("audio") {
            // Extra fields are ignored rather than rejected; browsers attach
            // all sorts of things alongside recorder uploads.
            continue;
        }
        let filename = field.file_name().unwrap_or("audio.webm").to_owned();
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::Validation(format!("failed to read audio field: {e}")))?;
        if data.len() > MAX_AUDIO_BYTES {
            return Err(ServerError::Validation(format!(
                "audio upload of {} bytes exceeds the {} MB limit",
                data.len(),
                MAX_AUDIO_BYTES / (1024 * 1024),
            )));
        }
        upload = Some((data.to_vec(), filename));
    }

    let (audio, filename) = upload
        .ok_or_else(|| ServerError::Validation("multipart field 'audio' is required".into()))?;
    if audio.is_empty() {
        return Err(ServerError::Validation("audio upload is empty".into()));
    }

    debug!(filename = %filename, bytes = audio.len(), "forwarding audio for transcription");
    Ok(state.upstream.transcribe_audio(audio, filename).await?)
}

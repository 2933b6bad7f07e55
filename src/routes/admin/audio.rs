//! Superadmin TTS / STT endpoints.

use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Response;
use axum::routing::{get, post};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::extract::{Json, Query};
use crate::routes::audio::{self, MAX_AUDIO_BYTES};
use crate::schemas::audio::{SttUpload, TtsQuery};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(super_tts, super_stt), components(schemas(TtsQuery, SttUpload)))]
pub struct AudioApi;

pub fn tts_router() -> Router<Arc<AppState>> {
    Router::new().route("/tts", get(super_tts))
}

pub fn stt_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stt", post(super_stt))
        // Room for the 20 MB payload plus multipart framing.
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES + 64 * 1024))
}

#[utoipa::path(
    get,
    path = "/api/super/tts",
    tag = "super",
    params(
        ("text" = String, Query, description = "Text to synthesise"),
        ("voice" = Option<String>, Query, description = "Voice override"),
    ),
    responses(
        (status = 200, description = "MP3 audio", content_type = "audio/mpeg"),
        (status = 400, description = "Missing text, or server TTS disabled"),
        (status = 401, description = "Superadmin credential required"),
        (status = 429, description = "Rate limit exceeded"),
    )
)]
pub async fn super_tts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TtsQuery>,
) -> Result<Response, ServerError> {
    audio::run_tts(&state, params).await
}

#[utoipa::path(
    post,
    path = "/api/super/stt",
    tag = "super",
    request_body(content = SttUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Provider transcription JSON"),
        (status = 400, description = "Missing or oversized audio field"),
        (status = 401, description = "Superadmin credential required"),
        (status = 429, description = "Rate limit exceeded"),
    )
)]
pub async fn super_stt(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ServerError> {
    Ok(Json(audio::run_stt(&state, multipart).await?))
}

//! Audio route wire types.

use serde::Deserialize;
use utoipa::ToSchema;

/// Query parameters for the TTS routes.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TtsQuery {
    /// Text to synthesise. Required; validated in the handler so a missing
    /// value yields a structured 400 instead of an extractor rejection.
    pub text: Option<String>,
    /// Voice override; falls back to the configured settings voice.
    pub voice: Option<String>,
}

/// Documentation-only schema for the STT multipart upload.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SttUpload {
    /// Audio bytes, at most 20 MB.
    #[schema(value_type = String, format = Binary)]
    pub audio: String,
}

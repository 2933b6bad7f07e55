//! Settings wire types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which engine renders text-to-speech audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TtsEngine {
    /// Synthesis through the upstream provider; the relay returns MP3 bytes.
    Openai,
    /// Client-side synthesis (Web Speech API); the server TTS routes are
    /// disabled and answer with a `config` error.
    Browser,
}

impl TtsEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            TtsEngine::Openai => "openai",
            TtsEngine::Browser => "browser",
        }
    }

    /// Parse a stored / configured value, falling back to `Openai` on
    /// anything unrecognised so a hand-edited database row cannot brick
    /// the TTS routes.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "browser" => TtsEngine::Browser,
            "openai" => TtsEngine::Openai,
            other => {
                tracing::warn!(value = %other, "unknown tts engine; falling back to 'openai'");
                TtsEngine::Openai
            }
        }
    }
}

/// The settings singleton, as stored and as served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Settings {
    /// Model identifier passed to the upstream chat endpoint.
    pub model: String,
    pub tts_engine: TtsEngine,
    /// Voice passed to the upstream speech endpoint. Not validated against
    /// an allow-list; bad values surface as upstream errors on next use.
    pub tts_voice: String,
    /// Prepended as the first message of every chat exchange when non-empty.
    pub system_prompt: Option<String>,
}

/// Partial update body for `PUT /api/super/settings`.
///
/// Absent or empty fields leave the stored value unchanged; there is no way
/// to clear a field back to empty through this operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tts_engine: Option<TtsEngine>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tts_voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub system_prompt: Option<String>,
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn engine_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&TtsEngine::Browser).unwrap(), "\"browser\"");
    }

    #[test]
    fn engine_parse_is_lenient() {
        assert_eq!(TtsEngine::parse("Browser"), TtsEngine::Browser);
        assert_eq!(TtsEngine::parse(" openai "), TtsEngine::Openai);
        assert_eq!(TtsEngine::parse("espeak"), TtsEngine::Openai);
    }
}

//! Server configuration, loaded from environment variables at startup.

use crate::schemas::settings::{Settings, TtsEngine};

/// Runtime configuration for chat-relay.
///
/// Every field except the upstream API key has a sensible default so the
/// server works out-of-the-box with only `OPENAI_API_KEY` set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// SQLite (or other) database URL (default: `"sqlite://relay.db"`).
    /// Supports any sqlx-compatible connection string.
    pub database_url: String,

    /// API key for the upstream provider. Required; startup fails without it.
    pub openai_api_key: String,

    /// Base URL of the upstream provider's v1 API. Overridable so tests and
    /// self-hosted gateways can point the relay elsewhere.
    pub openai_base_url: String,

    /// Static shared secret accepted in the `x-admin-token` header in place
    /// of a verified superadmin credential. Disabled when unset.
    pub admin_bypass_token: Option<String>,

    /// HS256 secret for verifying role-bearing JWTs. Without it no request
    /// ever resolves a role.
    pub jwt_secret: Option<String>,

    /// Expected `iss` claim. When unset the issuer is not checked.
    pub jwt_issuer: Option<String>,

    /// Seed values for the settings row on first startup.
    pub default_model: String,
    pub default_tts_engine: TtsEngine,
    pub default_tts_voice: String,
    pub default_system_prompt: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Serve Swagger UI at `/swagger-ui` (default: true; disable in prod).
    pub enable_swagger: bool,

    /// Comma-separated CORS origin allow-list; wildcard when unset.
    pub cors_allowed_origins: Option<String>,

    /// Per-minute fixed-window rate limits, per route family.
    pub rate_super_chat_per_min: u32,
    pub rate_user_chat_per_min: u32,
    pub rate_tts_per_min: u32,
    pub rate_stt_per_min: u32,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    ///
    /// Returns an error when `OPENAI_API_KEY` is absent: a relay without an
    /// upstream credential can only ever return errors, so it refuses to start.
    pub fn from_env() -> anyhow::Result<Self> {
        let openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            anyhow::anyhow!("OPENAI_API_KEY must be set; chat-relay cannot reach its upstream without it")
        })?;

        Ok(Self {
            bind_address: env_or("RELAY_BIND", "0.0.0.0:3000"),
            database_url: env_or("RELAY_DATABASE_URL", "sqlite://relay.db"),
            openai_api_key,
            openai_base_url: env_or("RELAY_OPENAI_BASE_URL", "https://api.openai.com/v1"),
            admin_bypass_token: env_opt("RELAY_ADMIN_BYPASS_TOKEN"),
            jwt_secret: env_opt("RELAY_JWT_SECRET"),
            jwt_issuer: env_opt("RELAY_JWT_ISSUER"),
            default_model: env_or("RELAY_DEFAULT_MODEL", "gpt-4o-mini"),
            default_tts_engine: TtsEngine::parse(&env_or("RELAY_TTS_ENGINE", "openai")),
            default_tts_voice: env_or("RELAY_TTS_VOICE", "alloy"),
            default_system_prompt: env_opt("RELAY_SYSTEM_PROMPT"),
            log_level: env_or("RELAY_LOG", "info"),
            log_json: std::env::var("RELAY_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            enable_swagger: std::env::var("RELAY_ENABLE_SWAGGER")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            cors_allowed_origins: env_opt("RELAY_CORS_ORIGINS"),
            rate_super_chat_per_min: parse_env("RELAY_RATE_SUPER_CHAT", 60),
            rate_user_chat_per_min: parse_env("RELAY_RATE_USER_CHAT", 30),
            rate_tts_per_min: parse_env("RELAY_RATE_TTS", 30),
            rate_stt_per_min: parse_env("RELAY_RATE_STT", 20),
        })
    }

    /// The settings row seeded on first startup.
    pub fn default_settings(&self) -> Settings {
        Settings {
            model: self.default_model.clone(),
            tts_engine: self.default_tts_engine,
            tts_voice: self.default_tts_voice.clone(),
            system_prompt: self.default_system_prompt.clone(),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Empty values count as unset so `RELAY_JWT_SECRET=""` does not silently
/// enable verification against an empty secret.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

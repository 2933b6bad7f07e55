//! Role resolution and the superadmin guard.
//!
//! A role is derived per request from an HS256 JWT presented either as an
//! `Authorization: Bearer` header or a `token` cookie. Verification failure
//! or absence simply yields no role; the only hard gate in the system is
//! [`require_superadmin`].
//!
//! User-tier routes are deliberately permissive: [`resolve_actor`] tags each
//! request with a best-effort caller identity for the audit log without ever
//! rejecting. This is a placeholder, not an authorization gate — deployments
//! that need real user enforcement must put one in front of the relay.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::Config;
use crate::error::ServerError;
use crate::state::AppState;

/// Header carrying the static development bypass secret.
pub const ADMIN_BYPASS_HEADER: &str = "x-admin-token";

/// Cookie holding the role-bearing JWT.
const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Superadmin,
    User,
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[allow(dead_code)]
    exp: u64,
}

/// Guard for `/api/super/*`: passes on a verified superadmin role or an
/// exact match of the configured bypass secret; rejects with 401 otherwise.
pub async fn require_superadmin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if bypass_token_matches(req.headers(), &state.config)
        || resolve_role(req.headers(), &state.config) == Some(Role::Superadmin)
    {
        return Ok(next.run(req).await);
    }
    Err(ServerError::Auth(
        "superadmin role or admin bypass token required".into(),
    ))
}

/// Decode the caller's role, if any. Absent/invalid/expired tokens and
/// unknown role claims all resolve to `None`.
pub fn resolve_role(headers: &HeaderMap, config: &Config) -> Option<Role> {
    match decode_claims(headers, config)?.role.as_deref() {
        Some("superadmin") => Some(Role::Superadmin),
        Some("user") => Some(Role::User),
        _ => None,
    }
}

/// Best-effort caller identity for audit tagging. Never rejects.
///
/// Precedence: explicit id from the request body, then the JWT `sub` claim,
/// then an IP-derived pseudonym.
pub fn resolve_actor(
    headers: &HeaderMap,
    client_ip: &str,
    explicit: Option<&str>,
    config: &Config,
) -> String {
    if let Some(id) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return id.to_owned();
    }
    if let Some(sub) = decode_claims(headers, config).and_then(|c| c.sub) {
        return sub;
    }
    format!("ip:{client_ip}")
}

fn bypass_token_matches(headers: &HeaderMap, config: &Config) -> bool {
    let Some(expected) = config.admin_bypass_token.as_deref() else {
        return false;
    };
    headers
        .get(ADMIN_BYPASS_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|provided| provided == expected)
}

fn decode_claims(headers: &HeaderMap, config: &Config) -> Option<Claims> {
    let secret = config.jwt_secret.as_deref()?;
    let token = bearer_token(headers).or_else(|| cookie_token(headers))?;

    let mut validation = Validation::new(Algorithm::HS256);
    if let Some(issuer) = config.jwt_issuer.as_deref() {
        validation.set_issuer(&[issuer]);
    }

    jsonwebtoken::decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == TOKEN_COOKIE).then(|| value.to_owned())
        })
        .next()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".into(),
            database_url: "sqlite::memory:".into(),
            openai_api_key: "k".into(),
            openai_base_url: "http://localhost".into(),
            admin_bypass_token: Some("letmein".into()),
            jwt_secret: Some(SECRET.into()),
            jwt_issuer: Some("relay-test".into()),
            default_model: "m".into(),
            default_tts_engine: crate::schemas::settings::TtsEngine::Openai,
            default_tts_voice: "alloy".into(),
            default_system_prompt: None,
            log_level: "info".into(),
            log_json: false,
            enable_swagger: false,
            cors_allowed_origins: None,
            rate_super_chat_per_min: 60,
            rate_user_chat_per_min: 30,
            rate_tts_per_min: 30,
            rate_stt_per_min: 20,
        }
    }

    fn token(role: &str, sub: &str) -> String {
        let claims = json!({
            "sub": sub,
            "role": role,
            "iss": "relay-test",
            "exp": 4_102_444_800u64, // 2100-01-01
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        headers
    }

    #[test]
    fn superadmin_role_resolves_from_bearer_header() {
        let headers = bearer_headers(&token("superadmin", "root"));
        assert_eq!(resolve_role(&headers, &test_config()), Some(Role::Superadmin));
    }

    #[test]
    fn role_resolves_from_cookie() {
        let mut headers = HeaderMap::new();
        let value = format!("theme=dark; token={}", token("user", "alice"));
        headers.insert(header::COOKIE, value.parse().unwrap());
        assert_eq!(resolve_role(&headers, &test_config()), Some(Role::User));
    }

    #[test]
    fn garbage_token_resolves_to_no_role() {
        let headers = bearer_headers("not.a.jwt");
        assert_eq!(resolve_role(&headers, &test_config()), None);
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let claims = json!({
            "role": "superadmin",
            "iss": "someone-else",
            "exp": 4_102_444_800u64,
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(resolve_role(&bearer_headers(&token), &test_config()), None);
    }

    #[test]
    fn missing_jwt_secret_disables_roles_entirely() {
        let mut config = test_config();
        config.jwt_secret = None;
        let headers = bearer_headers(&token("superadmin", "root"));
        assert_eq!(resolve_role(&headers, &config), None);
    }

    #[test]
    fn bypass_header_must_match_exactly() {
        let config = test_config();
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_BYPASS_HEADER, "letmein".parse().unwrap());
        assert!(bypass_token_matches(&headers, &config));

        headers.insert(ADMIN_BYPASS_HEADER, "letmein ".parse().unwrap());
        assert!(!bypass_token_matches(&headers, &config));
    }

    #[test]
    fn actor_precedence_explicit_then_sub_then_ip() {
        let config = test_config();
        let headers = bearer_headers(&token("user", "alice"));

        assert_eq!(resolve_actor(&headers, "1.2.3.4", Some("bob"), &config), "bob");
        assert_eq!(resolve_actor(&headers, "1.2.3.4", Some("  "), &config), "alice");
        assert_eq!(
            resolve_actor(&HeaderMap::new(), "1.2.3.4", None, &config),
            "ip:1.2.3.4"
        );
    }
}

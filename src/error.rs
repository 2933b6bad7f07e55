//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response `{"error": <code>, "detail": <string>}`
//! with an appropriate status code.
//!
//! **Security note:** Internal errors (Database, Internal) are logged with
//! full detail but only a generic message is returned to the caller so that
//! file paths, SQL, or other implementation details never leak to clients.
//! Upstream provider errors are the deliberate exception: their status code
//! and body are forwarded verbatim so callers see exactly what the provider
//! said.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::upstream::UpstreamError;

/// All errors that can occur in the chat-relay request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller lacks the superadmin role and presented no bypass token.
    #[error("unauthorised: {0}")]
    Auth(String),

    /// The caller exhausted its fixed-window request budget.
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    Validation(String),

    /// The request targets a feature the current settings disable.
    #[error("feature disabled: {0}")]
    Config(String),

    /// Non-success response from the upstream provider, forwarded verbatim.
    #[error("upstream returned {status}")]
    Upstream { status: u16, body: String },

    /// Propagated from the SQLite (or other) store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// The fixed machine-readable code emitted in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Auth(_) => "auth",
            ServerError::RateLimited(_) => "rate_limited",
            ServerError::Validation(_) => "validation",
            ServerError::Config(_) => "config",
            ServerError::Upstream { .. } => "upstream",
            ServerError::Database(_) | ServerError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, detail) = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::Auth(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            ServerError::RateLimited(m) => (StatusCode::TOO_MANY_REQUESTS, m.clone()),
            ServerError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Config(m) => (StatusCode::BAD_REQUEST, m.clone()),

            // Provider errors: forward the provider's status and body.
            ServerError::Upstream { status, body } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body.clone(),
            ),

            // Internal errors: log the full detail, return a generic message.
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": code, "detail": detail }))).into_response()
    }
}

impl From<UpstreamError> for ServerError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::Status { status, body } => ServerError::Upstream { status, body },
            UpstreamError::Transport(e) => ServerError::Internal(format!("upstream transport error: {e}")),
        }
    }
}

// Extractor rejections surface through the same envelope as handler errors.

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::Validation(rejection.body_text())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn upstream_error_forwards_status() {
        let err = ServerError::Upstream {
            status: 402,
            body: "quota exhausted".into(),
        };
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn invalid_upstream_status_falls_back_to_500() {
        let err = ServerError::Upstream {
            status: 42,
            body: String::new(),
        };
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ServerError::Auth(String::new()).code(), "auth");
        assert_eq!(ServerError::RateLimited(String::new()).code(), "rate_limited");
        assert_eq!(ServerError::Validation(String::new()).code(), "validation");
        assert_eq!(ServerError::Config(String::new()).code(), "config");
        assert_eq!(
            ServerError::Upstream { status: 500, body: String::new() }.code(),
            "upstream"
        );
        assert_eq!(ServerError::Internal(String::new()).code(), "internal");
    }
}

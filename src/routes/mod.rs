//! HTTP route layer.
//!
//! `build` assembles the full application router:
//!
//! ```text
//! /api/health                    liveness probe
//! /api/super/...                 superadmin tier (guarded, rate limited)
//! /api/chat/user/send, /tts, /stt  public tier (rate limited only)
//! /swagger-ui                    interactive API docs (optional)
//! ```
//!
//! Middleware order, outermost first: trace (span + ClientIp), CORS, then the
//! per-route rate and guard layers attached inside the tier routers.

pub mod admin;
pub mod audio;
pub mod chat;
pub mod doc;
pub mod health;
pub mod user;

use std::sync::Arc;

use axum::{Router, middleware};
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

pub fn build(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(user::router(state.clone()))
        .nest("/super", admin::router(state.clone()));

    let mut app = Router::new().nest("/api", api);

    if state.config.enable_swagger {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::openapi()),
        );
    }

    app.layer(cors::cors_layer(state.clone()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trace::trace_middleware,
        ))
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

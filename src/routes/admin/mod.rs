//! Superadmin tier, nested under `/api/super`.
//!
//! Every route sits behind [`auth::require_superadmin`]; chat and audio
//! routes additionally carry per-route fixed-window budgets. The rate layer
//! wraps the guard so over-budget callers are turned away before any
//! credential work happens.

pub mod audio;
pub mod chat;
pub mod logs;
pub mod settings;

use std::sync::Arc;

use axum::{Router, middleware};
use utoipa::OpenApi;

use crate::middleware::auth;
use crate::rate_limit::{self, RatePolicy};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let guard = |router: Router<Arc<AppState>>| {
        router.route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_superadmin,
        ))
    };
    let limited = |router: Router<Arc<AppState>>, policy: RatePolicy| {
        router.route_layer(middleware::from_fn_with_state(
            (state.clone(), policy),
            rate_limit::enforce,
        ))
    };

    Router::new()
        .merge(guard(settings::router()))
        .merge(guard(logs::router()))
        .merge(limited(
            guard(chat::router()),
            RatePolicy::per_minute("super_chat", state.config.rate_super_chat_per_min),
        ))
        .merge(limited(
            guard(audio::tts_router()),
            RatePolicy::per_minute("super_tts", state.config.rate_tts_per_min),
        ))
        .merge(limited(
            guard(audio::stt_router()),
            RatePolicy::per_minute("super_stt", state.config.rate_stt_per_min),
        ))
}

#[derive(OpenApi)]
#[openapi()]
pub struct AdminApi;

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut doc = AdminApi::openapi();
    doc.merge(settings::SettingsApi::openapi());
    doc.merge(chat::ChatApi::openapi());
    doc.merge(audio::AudioApi::openapi());
    doc.merge(logs::LogsApi::openapi());
    doc
}

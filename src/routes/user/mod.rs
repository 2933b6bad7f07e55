//! Public tier, mounted directly under `/api`.
//!
//! These routes carry rate budgets but no credential gate.

pub mod audio;
pub mod chat;

use std::sync::Arc;

use axum::{Router, middleware};
use utoipa::OpenApi;

use crate::rate_limit::{self, RatePolicy};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let limited = |router: Router<Arc<AppState>>, policy: RatePolicy| {
        router.route_layer(middleware::from_fn_with_state(
            (state.clone(), policy),
            rate_limit::enforce,
        ))
    };

    Router::new()
        .merge(limited(
            chat::router(),
            RatePolicy::per_minute("user_chat", state.config.rate_user_chat_per_min),
        ))
        .merge(limited(
            audio::tts_router(),
            RatePolicy::per_minute("user_tts", state.config.rate_tts_per_min),
        ))
        .merge(limited(
            audio::stt_router(),
            RatePolicy::per_minute("user_stt", state.config.rate_stt_per_min),
        ))
}

#[derive(OpenApi)]
#[openapi()]
pub struct UserApi;

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut doc = UserApi::openapi();
    doc.merge(chat::UserChatApi::openapi());
    doc.merge(audio::UserAudioApi::openapi());
    doc
}

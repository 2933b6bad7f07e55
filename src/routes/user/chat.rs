//! Public chat endpoint.
//!
//! No credential gate: anyone can talk, and the interaction log records a
//! best-effort identity (explicit id, token subject, or client address).

use std::sync::Arc;

use axum::Router;
use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use axum::routing::post;
use utoipa::OpenApi;

use crate::entities::Scope;
use crate::error::ServerError;
use crate::extract::Json;
use crate::middleware::auth;
use crate::middleware::trace::ClientIp;
use crate::routes::chat;
use crate::schemas::chat::{ChatReply, UserChatRequest};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(user_send), components(schemas(UserChatRequest)))]
pub struct UserChatApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat/user/send", post(user_send))
}

#[utoipa::path(
    post,
    path = "/api/chat/user/send",
    tag = "user",
    request_body = UserChatRequest,
    responses(
        (status = 200, description = "Model reply", body = ChatReply),
        (status = 400, description = "Empty message list"),
        (status = 429, description = "Rate limit exceeded"),
    )
)]
pub async fn user_send(
    State(state): State<Arc<AppState>>,
    Extension(client_ip): Extension<ClientIp>,
    headers: HeaderMap,
    Json(req): Json<UserChatRequest>,
) -> Result<Json<ChatReply>, ServerError> {
    let actor = auth::resolve_actor(
        &headers,
        &client_ip.0,
        req.user_id.as_deref(),
        &state.config,
    );
    let reply = chat::run_chat(&state, Scope::User, actor, req.messages).await?;
    Ok(Json(reply))
}

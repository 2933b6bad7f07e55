//! Superadmin chat endpoint.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use utoipa::OpenApi;

use crate::entities::Scope;
use crate::error::ServerError;
use crate::extract::Json;
use crate::routes::chat;
use crate::schemas::chat::{ChatMessage, ChatReply, SuperChatRequest, Usage};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(super_chat),
    components(schemas(SuperChatRequest, ChatReply, ChatMessage, Usage))
)]
pub struct ChatApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(super_chat))
}

/// Chat exchange on behalf of the admin console.
///
/// The log actor is `admin_user` when supplied, `"superadmin"` otherwise.
#[utoipa::path(
    post,
    path = "/api/super/chat",
    tag = "super",
    request_body = SuperChatRequest,
    responses(
        (status = 200, description = "Model reply", body = ChatReply),
        (status = 401, description = "Superadmin credential required"),
        (status = 429, description = "Rate limit exceeded"),
    )
)]
pub async fn super_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuperChatRequest>,
) -> Result<Json<ChatReply>, ServerError> {
    let actor = req
        .admin_user
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("superadmin")
        .to_owned();
    let reply = chat::run_chat(&state, Scope::Super, actor, req.messages).await?;
    Ok(Json(reply))
}

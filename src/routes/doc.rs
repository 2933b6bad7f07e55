//! Aggregated OpenAPI document served by Swagger UI.

use utoipa::OpenApi;

use crate::routes::{admin, health, user};

#[derive(OpenApi)]
#[openapi(info(
    title = "chat-relay",
    description = "LLM chat, speech synthesis and transcription relay"
))]
pub struct ApiDoc;

pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(health::HealthApi::openapi());
    doc.merge(admin::api_docs());
    doc.merge(user::api_docs());
    doc
}

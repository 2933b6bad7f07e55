//! Settings management endpoints (superadmin tier).

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use utoipa::OpenApi;

use crate::entities::SettingsStore;
use crate::error::ServerError;
use crate::extract::Json;
use crate::schemas::settings::{Settings, SettingsPatch, TtsEngine};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_settings, update_settings),
    components(schemas(Settings, SettingsPatch, TtsEngine))
)]
pub struct SettingsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}

#[utoipa::path(
    get,
    path = "/api/super/settings",
    tag = "super",
    responses(
        (status = 200, description = "Current settings", body = Settings),
        (status = 401, description = "Superadmin credential required"),
    )
)]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Settings>, ServerError> {
    Ok(Json(state.store.get_settings().await?))
}

/// Partial update: absent or empty fields leave the stored value unchanged.
#[utoipa::path(
    put,
    path = "/api/super/settings",
    tag = "super",
    request_body = SettingsPatch,
    responses(
        (status = 200, description = "Settings after the update", body = Settings),
        (status = 401, description = "Superadmin credential required"),
    )
)]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Settings>, ServerError> {
    Ok(Json(state.store.update_settings(&patch).await?))
}

//! Interaction-log query endpoint (superadmin tier).

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use utoipa::OpenApi;

use crate::entities::LogStore;
use crate::error::ServerError;
use crate::extract::{Json, Query};
use crate::schemas::logs::{LogEntry, LogQuery};
use crate::state::AppState;

/// Default result cap when the caller does not specify one.
const DEFAULT_LIMIT: u32 = 50;

#[derive(OpenApi)]
#[openapi(paths(query_logs), components(schemas(LogEntry)))]
pub struct LogsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/logs", get(query_logs))
}

/// Most-recent-first log query with optional substring filter.
#[utoipa::path(
    get,
    path = "/api/super/logs",
    tag = "super",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive substring filter"),
        ("limit" = Option<u32>, Query, description = "Result cap (default 50, max 200)"),
    ),
    responses(
        (status = 200, description = "Logged exchanges, newest first", body = Vec<LogEntry>),
        (status = 401, description = "Superadmin credential required"),
    )
)]
pub async fn query_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogQuery>,
) -> Result<Json<Vec<LogEntry>>, ServerError> {
    let filter = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    Ok(Json(state.store.query_logs(filter, limit).await?))
}

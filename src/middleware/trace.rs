//! Per-request tracing span with trace-ID propagation.
//!
//! Also stamps a [`ClientIp`] extension onto the request so downstream
//! middleware (rate limiting) and handlers (actor tagging) agree on the
//! caller's address without re-deriving it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::state::AppState;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Client address as seen at the connection level; `"unknown"` when the
/// server runs without connect info (router-level tests).
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

pub async fn trace_middleware(
    State(_state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned());
    req.extensions_mut().insert(ClientIp(client_ip.clone()));

    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %method,
        path = %path,
        client_ip = %client_ip,
    );

    async move {
        info!("→ request started");

        if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
            req.headers_mut().insert(X_TRACE_ID, value.clone());
            let mut response = next.run(req).await;
            response.headers_mut().insert(X_TRACE_ID, value);
            info!(
                status = response.status().as_u16(),
                latency_ms = start.elapsed().as_millis() as u64,
                "← response finished"
            );
            response
        } else {
            next.run(req).await
        }
    }
    .instrument(span)
    .await
}

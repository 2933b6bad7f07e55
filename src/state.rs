//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::entities::SqliteStore;
use crate::rate_limit::RateLimiter;
use crate::upstream::Upstream;

/// State shared across all HTTP handlers.
///
/// Always wrapped in an `Arc` by `main`; handlers receive it via
/// `State<Arc<AppState>>`. The upstream client sits behind a trait object
/// so tests can substitute a mock without touching route logic.
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Persistent settings + chat log store.
    pub store: Arc<SqliteStore>,
    /// Client for the external LLM provider.
    pub upstream: Arc<dyn Upstream>,
    /// Fixed-window request counters, keyed by client IP.
    pub limiter: RateLimiter,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

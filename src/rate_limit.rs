//! Fixed-window per-client rate limiting.
//!
//! Counters live in process memory only: restarting the server clears all
//! buckets, and bursts straddling a window boundary are accepted by design.
//! Per-route budgets come from [`crate::config::Config`] and are enforced by
//! [`enforce`], mounted as a `route_layer` in front of the guarded handlers.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ServerError;
use crate::middleware::trace::ClientIp;
use crate::state::AppState;

#[derive(Debug)]
struct Bucket {
    count: u32,
    reset_at: Instant,
}

/// Map of per-key request counters. One window per key; the count resets
/// exactly at the window boundary, never partially.
#[derive(Debug, Default)]
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request for `key` and report whether it fits the budget.
    pub fn allow(&self, key: &str, limit: u32, window: Duration) -> bool {
        self.allow_at(key, limit, window, Instant::now())
    }

    fn allow_at(&self, key: &str, limit: u32, window: Duration, now: Instant) -> bool {
        let mut buckets = match self.buckets.lock() {
            Ok(guard) => guard,
            // A poisoned lock still holds valid counters.
            Err(poisoned) => poisoned.into_inner(),
        };
        let bucket = buckets.entry(key.to_owned()).or_insert(Bucket {
            count: 0,
            reset_at: now + window,
        });
        if now >= bucket.reset_at {
            bucket.count = 0;
            bucket.reset_at = now + window;
        }
        bucket.count += 1;
        bucket.count <= limit
    }
}

/// Budget applied to one route family.
#[derive(Clone, Debug)]
pub struct RatePolicy {
    /// Name used in the 429 detail string, e.g. `"user_chat"`.
    pub name: &'static str,
    pub limit: u32,
    pub window: Duration,
}

impl RatePolicy {
    pub fn per_minute(name: &'static str, limit: u32) -> Self {
        Self {
            name,
            limit,
            window: Duration::from_secs(60),
        }
    }
}

/// Axum middleware enforcing a [`RatePolicy`] keyed by client IP.
///
/// Mounted via `middleware::from_fn_with_state((state, policy), enforce)` so
/// each route family carries its own budget while sharing one limiter.
pub async fn enforce(
    State((state, policy)): State<(Arc<AppState>, RatePolicy)>,
    req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    // Budgets are independent per route family, so the policy name is part
    // of the bucket key.
    let key = format!("{}:{}", policy.name, client_key(&req));
    if !state.limiter.allow(&key, policy.limit, policy.window) {
        return Err(ServerError::RateLimited(format!(
            "{} budget of {} requests per {}s exhausted",
            policy.name,
            policy.limit,
            policy.window.as_secs(),
        )));
    }
    Ok(next.run(req).await)
}

fn client_key(req: &Request) -> String {
    if let Some(ip) = req.extensions().get::<ClientIp>() {
        return ip.0.clone();
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn limit_plus_one_denies_the_final_call() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        for _ in 0..5 {
            assert!(limiter.allow_at("k", 5, WINDOW, now));
        }
        assert!(!limiter.allow_at("k", 5, WINDOW, now));
    }

    #[test]
    fn window_elapse_resets_the_count() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        for _ in 0..3 {
            limiter.allow_at("k", 2, WINDOW, now);
        }
        assert!(!limiter.allow_at("k", 2, WINDOW, now));

        let later = now + WINDOW + Duration::from_millis(1);
        assert!(limiter.allow_at("k", 2, WINDOW, later));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        assert!(limiter.allow_at("a", 1, WINDOW, now));
        assert!(!limiter.allow_at("a", 1, WINDOW, now));
        assert!(limiter.allow_at("b", 1, WINDOW, now));
    }

    #[test]
    fn no_partial_decay_within_a_window() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        assert!(limiter.allow_at("k", 1, WINDOW, now));
        // Half a window later the count must still be held against the key.
        let mid = now + WINDOW / 2;
        assert!(!limiter.allow_at("k", 1, WINDOW, mid));
    }
}

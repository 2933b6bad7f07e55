//! HTTP middleware stack: role guard, CORS, per-request tracing.

pub mod auth;
pub mod cors;
pub mod trace;

//! Request extractors whose rejections use the unified error envelope.
//!
//! Axum's stock `Json` and `Query` answer malformed input with plain-text
//! rejections. These wrappers route the rejection through
//! [`ServerError::Validation`] so every failure a client can observe carries
//! the same `{"error", "detail"}` JSON shape.

use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ServerError;

/// JSON body extractor; rejects as a `validation` error.
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct Json<T>(pub T);

/// Also usable as a response, so handlers keep one `Json` in scope.
impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query-string extractor; rejects as a `validation` error.
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub struct Query<T>(pub T);

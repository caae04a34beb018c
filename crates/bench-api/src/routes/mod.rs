//! Route handlers for the benchmark endpoints.

pub mod db;
pub mod ping;
pub mod time;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Content type sent with every response body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Builds a response carrying an already-serialized JSON body.
pub fn json_response(status: StatusCode, body: impl Into<Body>) -> Response {
    (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body.into()).into_response()
}

/// Fallback for paths outside the routing table.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

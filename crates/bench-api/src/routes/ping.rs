//! Static ping endpoint.

use axum::http::StatusCode;
use axum::response::Response;

use super::json_response;

pub const PING_BODY: &str = r#"{"ok":true,"message":"OK"}"#;

/// GET /api/v2/ping — fixed body, no I/O.
pub async fn get() -> Response {
    json_response(StatusCode::OK, PING_BODY)
}

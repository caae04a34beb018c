//! Server clock endpoint.

use axum::http::StatusCode;
use axum::response::Response;
use chrono::Utc;

use super::json_response;

/// Formats `{"serverTime":<epoch seconds>}`.
pub fn time_body(epoch_seconds: i64) -> String {
    format!(r#"{{"serverTime":{epoch_seconds}}}"#)
}

/// GET /api/v2/time — current wall-clock time in whole seconds since the epoch.
pub async fn get() -> Response {
    json_response(StatusCode::OK, time_body(Utc::now().timestamp()))
}

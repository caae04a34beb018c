//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bench_db::DbError;
use serde::Serialize;

use crate::routes::json_response;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// No route matches the request path.
    NotFound,
    /// The database path failed for this request.
    Database(DbError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::Database(err) => db_error_to_response(err),
        };

        let body = serde_json::to_string(&ErrorBody { error: &message })
            .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
        json_response(status, body)
    }
}

fn db_error_to_response(err: DbError) -> (StatusCode, String) {
    match &err {
        DbError::NotReady | DbError::Closed | DbError::AcquireTimeout(_) => {
            tracing::warn!(error = %err, "database unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        DbError::QueryTimeout(_) => {
            tracing::error!(error = %err, "database query timed out");
            (StatusCode::GATEWAY_TIMEOUT, err.to_string())
        }
        DbError::Database(_) => {
            tracing::error!(error = %err, "database error");
            (StatusCode::INTERNAL_SERVER_ERROR, "db error".to_string())
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::Database(err)
    }
}

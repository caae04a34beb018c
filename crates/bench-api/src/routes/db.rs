//! Database-backed endpoints.
//!
//! Each handler borrows one pooled connection, runs one scalar query and
//! returns the text the database built, unchanged.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use bench_db::{BenchStore, BenchStoreExt};

use super::json_response;
use crate::AppState;
use crate::error::ApiError;

/// GET /api/v2/db/ping
pub async fn ping<S: BenchStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Response, ApiError> {
    let body = state.store.ping().await?;
    Ok(json_response(StatusCode::OK, body))
}

/// GET /api/v2/db/time
pub async fn time<S: BenchStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Response, ApiError> {
    let body = state.store.server_time().await?;
    Ok(json_response(StatusCode::OK, body))
}

//! HTTP benchmark target.
//!
//! Serves two in-process endpoints and two endpoints that make one round-trip
//! to PostgreSQL through a bounded connection pool, so request-handling
//! overhead can be measured with and without the database.

pub mod config;
pub mod error;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use bench_db::{BenchStore, ConnectionPool};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState<S: BenchStore> {
    pub store: S,
}

impl<S: BenchStore> AppState<S> {
    /// Wraps `store` for sharing across handlers.
    pub fn new(store: S) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: BenchStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/v2/ping", get(routes::ping::get))
        .route("/api/v2/time", get(routes::time::get))
        .route("/api/v2/db/ping", get(routes::db::ping::<S>))
        .route("/api/v2/db/time", get(routes::db::time::<S>))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves `app` until `shutdown` resolves and in-flight
/// requests have drained, then closes `pool`.
///
/// The pool is closed on every exit, including a failed bind or a server error.
pub async fn serve_until<F>(
    addr: &str,
    app: Router,
    pool: &ConnectionPool,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let served: std::io::Result<()> = async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
    .await;

    pool.close().await;
    served
}

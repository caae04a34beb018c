use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;

use crate::{
    BenchStore, DbError, Result, ScalarQuery,
    config::{DEFAULT_ACQUIRE_TIMEOUT, MAX_CONNECTIONS},
};

/// In-memory store implementation for testing and benchmarking the router.
///
/// Mirrors the pooled PostgreSQL store without a database: a semaphore
/// stands in for the connection pool (bounded borrows, acquire timeout,
/// close), an optional query timeout bounds the artificial latency, results
/// are formatted the way `json_build_object` formats them, and the database
/// can be switched to unreachable.
#[derive(Clone)]
pub struct InMemoryBenchStore {
    connections: Arc<Semaphore>,
    max_connections: usize,
    acquire_timeout: Duration,
    latency: Duration,
    query_timeout: Option<Duration>,
    reachable: Arc<AtomicBool>,
}

impl InMemoryBenchStore {
    /// Creates a store with the default pool bounds and no added latency.
    pub fn new() -> Self {
        Self::with_pool_limits(MAX_CONNECTIONS as usize, DEFAULT_ACQUIRE_TIMEOUT)
    }

    /// Creates a store lending at most `max_connections` at a time.
    pub fn with_pool_limits(max_connections: usize, acquire_timeout: Duration) -> Self {
        Self {
            connections: Arc::new(Semaphore::new(max_connections)),
            max_connections,
            acquire_timeout,
            latency: Duration::ZERO,
            query_timeout: None,
            reachable: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Holds each borrowed connection for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fails queries whose latency exceeds `timeout` with [`DbError::QueryTimeout`].
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Simulates the database going away (`false`) or coming back (`true`).
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Stops lending connections; later queries fail with [`DbError::Closed`].
    pub fn close(&self) {
        self.connections.close();
    }

    /// Returns the number of connections not currently borrowed.
    pub fn idle_connections(&self) -> usize {
        self.connections.available_permits()
    }

    /// Returns the upper bound on concurrently borrowed connections.
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    fn render(query: ScalarQuery) -> String {
        match query {
            ScalarQuery::Ping => r#"{"ok" : true, "message" : "OK"}"#.to_string(),
            ScalarQuery::ServerTime => {
                format!(r#"{{"serverTime" : {}}}"#, Utc::now().timestamp())
            }
        }
    }
}

impl Default for InMemoryBenchStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BenchStore for InMemoryBenchStore {
    async fn fetch_scalar(&self, query: ScalarQuery) -> Result<String> {
        let acquire = tokio::time::timeout(self.acquire_timeout, self.connections.acquire());
        let _conn = match acquire.await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(DbError::Closed),
            Err(_) => return Err(DbError::AcquireTimeout(self.acquire_timeout)),
        };

        if !self.latency.is_zero() {
            let query_time = tokio::time::sleep(self.latency);
            match self.query_timeout {
                Some(limit) => tokio::time::timeout(limit, query_time)
                    .await
                    .map_err(|_| DbError::QueryTimeout(limit))?,
                None => query_time.await,
            }
        }

        if !self.reachable.load(Ordering::SeqCst) {
            return Err(DbError::Database(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "database unreachable",
            ))));
        }

        Ok(Self::render(query))
    }
}

//! Connection pool lifecycle and scoped connection borrowing.
//!
//! A [`ConnectionPool`] moves through three states:
//!
//! ```text
//! Uninitialized ──init()──▶ Ready ──close()──▶ Closed
//! ```
//!
//! Connections are lent as [`PooledConnection`] values that go back to the
//! pool when dropped, whatever path the borrowing request takes.

use std::time::Duration;

use sqlx::{
    Postgres,
    pool::PoolConnection,
    postgres::{PgPool, PgPoolOptions},
};
use tokio::sync::RwLock;

use crate::{DbError, PoolConfig, Result, ScalarQuery};

enum PoolState {
    Uninitialized,
    Ready(PgPool),
    Closed,
}

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Connections currently open, idle or lent out.
    pub size: u32,
    /// Open connections waiting in the pool.
    pub idle: usize,
    /// Upper bound on open connections.
    pub max: u32,
}

impl PoolStatus {
    /// Connections currently lent to callers.
    pub fn in_use(&self) -> usize {
        (self.size as usize).saturating_sub(self.idle)
    }
}

/// Bounded pool of PostgreSQL connections with an explicit lifecycle.
pub struct ConnectionPool {
    config: PoolConfig,
    state: RwLock<PoolState>,
}

impl ConnectionPool {
    /// Creates an uninitialized pool. No connection is opened until [`init`](Self::init).
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            state: RwLock::new(PoolState::Uninitialized),
        }
    }

    /// Returns the configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Creates the underlying pool.
    ///
    /// Sockets are opened on demand and by the pool's min-connection
    /// maintenance, so this succeeds even while the database is down.
    /// Calling it again on a ready pool is a no-op; calling it on a closed
    /// pool fails with [`DbError::Closed`].
    pub async fn init(&self) -> Result<()> {
        let mut state = self.state.write().await;
        match *state {
            PoolState::Ready(_) => Ok(()),
            PoolState::Closed => Err(DbError::Closed),
            PoolState::Uninitialized => {
                let pool = PgPoolOptions::new()
                    .min_connections(self.config.min_connections)
                    .max_connections(self.config.max_connections)
                    .acquire_timeout(self.config.acquire_timeout)
                    .connect_lazy_with(self.config.connect_options());
                *state = PoolState::Ready(pool);

                tracing::info!(
                    host = %self.config.host,
                    port = self.config.port,
                    database = %self.config.database,
                    min = self.config.min_connections,
                    max = self.config.max_connections,
                    "connection pool initialized"
                );
                Ok(())
            }
        }
    }

    /// Borrows a connection, waiting at most the configured acquire timeout.
    pub async fn acquire(&self) -> Result<PooledConnection> {
        let pool = self.handle().await?;
        let conn = pool
            .acquire()
            .await
            .map_err(|e| DbError::from_acquire(e, self.config.acquire_timeout))?;

        Ok(PooledConnection {
            conn: Some(conn),
            query_timeout: self.config.query_timeout,
        })
    }

    /// Closes every pooled connection. Safe to call more than once and on a
    /// pool that was never initialized.
    pub async fn close(&self) {
        let previous = {
            let mut state = self.state.write().await;
            std::mem::replace(&mut *state, PoolState::Closed)
        };

        if let PoolState::Ready(pool) = previous {
            pool.close().await;
            tracing::info!("connection pool closed");
        }
    }

    /// Returns true once [`init`](Self::init) succeeded and [`close`](Self::close) has not run.
    pub async fn is_ready(&self) -> bool {
        matches!(*self.state.read().await, PoolState::Ready(_))
    }

    /// Returns the current occupancy, or `None` when the pool is not ready.
    pub async fn status(&self) -> Option<PoolStatus> {
        match &*self.state.read().await {
            PoolState::Ready(pool) => Some(PoolStatus {
                size: pool.size(),
                idle: pool.num_idle(),
                max: self.config.max_connections,
            }),
            _ => None,
        }
    }

    async fn handle(&self) -> Result<PgPool> {
        match &*self.state.read().await {
            PoolState::Ready(pool) => Ok(pool.clone()),
            PoolState::Uninitialized => Err(DbError::NotReady),
            PoolState::Closed => Err(DbError::Closed),
        }
    }
}

/// A connection borrowed from a [`ConnectionPool`].
///
/// Dropping it returns the connection to the pool.
pub struct PooledConnection {
    conn: Option<PoolConnection<Postgres>>,
    query_timeout: Duration,
}

impl PooledConnection {
    /// Runs a scalar query and returns its single text value.
    ///
    /// On timeout the connection is detached from the pool and dropped,
    /// since its protocol state is unknown; the pool opens a replacement.
    pub async fn fetch_text(&mut self, query: ScalarQuery) -> Result<String> {
        let Some(conn) = self.conn.as_mut() else {
            return Err(DbError::Closed);
        };

        let fetch = sqlx::query_scalar::<_, String>(query.sql()).fetch_one(&mut **conn);
        match tokio::time::timeout(self.query_timeout, fetch).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                if let Some(conn) = self.conn.take() {
                    drop(conn.detach());
                }
                tracing::warn!(
                    %query,
                    timeout = ?self.query_timeout,
                    "query timed out, discarding connection"
                );
                Err(DbError::QueryTimeout(self.query_timeout))
            }
        }
    }
}

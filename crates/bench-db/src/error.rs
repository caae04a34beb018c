use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when borrowing a connection or running a query.
#[derive(Debug, Error)]
pub enum DbError {
    /// The pool has not been initialized yet.
    #[error("connection pool is not ready")]
    NotReady,

    /// The pool has been closed and no longer lends connections.
    #[error("connection pool is closed")]
    Closed,

    /// No connection became available within the acquire timeout.
    #[error("timed out after {0:?} waiting for a pooled connection")]
    AcquireTimeout(Duration),

    /// The query did not complete within the query timeout.
    #[error("query did not complete within {0:?}")]
    QueryTimeout(Duration),

    /// A connection or query error reported by the database driver.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DbError {
    /// Returns true when the pool itself could not lend a connection,
    /// as opposed to a failure reported by the database.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DbError::NotReady | DbError::Closed | DbError::AcquireTimeout(_)
        )
    }

    /// Maps an error returned by `Pool::acquire` to a pool-level error.
    pub(crate) fn from_acquire(err: sqlx::Error, acquire_timeout: Duration) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DbError::AcquireTimeout(acquire_timeout),
            sqlx::Error::PoolClosed => DbError::Closed,
            other => DbError::Database(other),
        }
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DbError>;

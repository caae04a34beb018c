use std::sync::Arc;

use async_trait::async_trait;

use crate::{BenchStore, ConnectionPool, Result, ScalarQuery, store::BenchStoreExt};

/// PostgreSQL-backed store running each query on a pooled connection.
#[derive(Clone)]
pub struct PostgresBenchStore {
    pool: Arc<ConnectionPool>,
}

impl PostgresBenchStore {
    /// Creates a store borrowing connections from `pool`.
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Runs the ping query once and reports whether the database answered.
    pub async fn probe(&self) -> Result<()> {
        self.ping().await.map(|_| ())
    }
}

#[async_trait]
impl BenchStore for PostgresBenchStore {
    async fn fetch_scalar(&self, query: ScalarQuery) -> Result<String> {
        let text = {
            let mut conn = self.pool.acquire().await?;
            conn.fetch_text(query).await
        };

        if let Err(ref err) = text {
            tracing::debug!(%query, error = %err, "scalar query failed");
        }
        text
    }
}

use async_trait::async_trait;

use crate::{Result, ScalarQuery};

/// Core trait for the database behind the benchmark routes.
///
/// Each call borrows one connection, runs one query, and gives the
/// connection back before returning, on success and on failure.
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait BenchStore: Send + Sync {
    /// Runs a scalar query and returns the JSON text it produced.
    async fn fetch_scalar(&self, query: ScalarQuery) -> Result<String>;
}

/// Extension trait providing the two benchmark queries by name.
#[async_trait]
pub trait BenchStoreExt: BenchStore {
    /// Returns `{"ok" : true, "message" : "OK"}` as produced by the database.
    async fn ping(&self) -> Result<String> {
        self.fetch_scalar(ScalarQuery::Ping).await
    }

    /// Returns `{"serverTime" : N}` with the database clock in epoch seconds.
    async fn server_time(&self) -> Result<String> {
        self.fetch_scalar(ScalarQuery::ServerTime).await
    }
}

impl<T: BenchStore + ?Sized> BenchStoreExt for T {}

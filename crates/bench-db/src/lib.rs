//! Pooled PostgreSQL access for the HTTP benchmark target.
//!
//! [`ConnectionPool`] owns the connections and their lifecycle,
//! [`BenchStore`] is the seam the HTTP layer talks to.

pub mod config;
pub mod error;
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod query;
pub mod store;

pub use config::PoolConfig;
pub use error::{DbError, Result};
pub use memory::InMemoryBenchStore;
pub use pool::{ConnectionPool, PoolStatus, PooledConnection};
pub use postgres::PostgresBenchStore;
pub use query::ScalarQuery;
pub use store::{BenchStore, BenchStoreExt};

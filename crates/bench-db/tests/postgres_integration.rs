//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p bench-db --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;
use std::time::Duration;

use bench_db::{
    BenchStoreExt, ConnectionPool, DbError, PoolConfig, PostgresBenchStore, ScalarQuery,
};
use chrono::Utc;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    host: String,
    port: u16,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default()
                .with_db_name("bench")
                .with_user("bench")
                .with_password("bench")
                .start()
                .await
                .unwrap();

            let host = container.get_host().await.unwrap().to_string();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            Arc::new(ContainerInfo {
                container,
                host,
                port,
            })
        })
        .await
        .clone()
}

/// Get a fresh, initialized pool pointed at the shared container.
///
/// Background min-connection maintenance is disabled so occupancy
/// assertions only see connections opened by the test itself.
async fn get_test_pool() -> Arc<ConnectionPool> {
    let info = get_container_info().await;
    let pool = Arc::new(ConnectionPool::new(PoolConfig {
        min_connections: 0,
        ..PoolConfig::for_endpoint(info.host.clone(), info.port)
    }));
    pool.init().await.unwrap();
    pool
}

#[tokio::test]
async fn db_ping_returns_server_built_json() {
    let pool = get_test_pool().await;
    let store = PostgresBenchStore::new(pool.clone());

    let body = store.ping().await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["message"], "OK");
    // json_build_object spaces its separators, which a hardcoded body would not.
    assert!(body.contains(" : "));

    pool.close().await;
}

#[tokio::test]
async fn db_time_tracks_wall_clock() {
    let pool = get_test_pool().await;
    let store = PostgresBenchStore::new(pool.clone());

    let body = store.server_time().await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let db_time = json["serverTime"].as_i64().unwrap();
    let now = Utc::now().timestamp();
    assert!((db_time - now).abs() <= 2, "db={db_time} local={now}");

    pool.close().await;
}

#[tokio::test]
async fn pooled_connection_runs_queries_and_returns_to_pool() {
    let pool = get_test_pool().await;

    {
        let mut conn = pool.acquire().await.unwrap();
        let text = conn.fetch_text(ScalarQuery::Ping).await.unwrap();
        assert!(text.contains("\"ok\""));
        assert_eq!(pool.status().await.unwrap().in_use(), 1);
    }

    // Release happens on drop; give the pool a moment to take it back.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(pool.status().await.unwrap().in_use(), 0);

    pool.close().await;
}

#[tokio::test]
async fn concurrent_requests_beyond_max_connections_all_succeed() {
    let pool = get_test_pool().await;
    let store = PostgresBenchStore::new(pool.clone());

    let results = futures_util::future::join_all((0..20).map(|_| {
        let store = store.clone();
        async move { store.ping().await }
    }))
    .await;

    assert_eq!(results.len(), 20);
    assert!(results.iter().all(|r| r.is_ok()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    let status = pool.status().await.unwrap();
    assert!(status.size <= 15);
    assert_eq!(status.in_use(), 0);

    pool.close().await;
}

#[tokio::test]
async fn exhausted_pool_reports_acquire_timeout() {
    let info = get_container_info().await;
    let config = PoolConfig {
        min_connections: 0,
        max_connections: 1,
        acquire_timeout: Duration::from_millis(200),
        ..PoolConfig::for_endpoint(info.host.clone(), info.port)
    };
    let pool = ConnectionPool::new(config);
    pool.init().await.unwrap();

    let held = pool.acquire().await.unwrap();
    let second = pool.acquire().await;
    assert!(matches!(second, Err(DbError::AcquireTimeout(_))));
    drop(held);

    let mut conn = pool.acquire().await.unwrap();
    assert!(conn.fetch_text(ScalarQuery::ServerTime).await.is_ok());
    drop(conn);

    pool.close().await;
}

#[tokio::test]
async fn timed_out_query_discards_connection() {
    let info = get_container_info().await;
    let config = PoolConfig {
        min_connections: 0,
        max_connections: 1,
        acquire_timeout: Duration::from_secs(2),
        query_timeout: Duration::from_nanos(1),
        ..PoolConfig::for_endpoint(info.host.clone(), info.port)
    };
    let pool = ConnectionPool::new(config);
    pool.init().await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(pool.status().await.unwrap().size, 1);

    // With the clock paused the runtime jumps to the deadline as soon as it
    // parks on the socket, so the reply can never beat the timeout.
    tokio::time::pause();
    let result = conn.fetch_text(ScalarQuery::Ping).await;
    tokio::time::resume();

    assert!(matches!(result, Err(DbError::QueryTimeout(d)) if d == Duration::from_nanos(1)));
    assert_eq!(pool.status().await.unwrap().size, 0);

    // The emptied borrow reports closed and gives nothing back on drop.
    assert!(matches!(
        conn.fetch_text(ScalarQuery::Ping).await,
        Err(DbError::Closed)
    ));
    drop(conn);
    assert_eq!(pool.status().await.unwrap().size, 0);

    // The single slot was freed, so the pool opens a replacement connection.
    let replacement = pool.acquire().await.unwrap();
    assert_eq!(pool.status().await.unwrap().size, 1);
    drop(replacement);

    pool.close().await;
}

#[tokio::test]
async fn closed_pool_rejects_acquire() {
    let pool = get_test_pool().await;
    let store = PostgresBenchStore::new(pool.clone());
    assert!(store.probe().await.is_ok());

    pool.close().await;
    assert!(matches!(store.ping().await, Err(DbError::Closed)));
}

//! Benchmark server entry point.

use std::sync::Arc;

use bench_api::config::{Config, LogFormat};
use bench_db::{ConnectionPool, PoolConfig, PostgresBenchStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);
    let pool_config = PoolConfig::from_env();

    // 2. Build the runtime, honoring WORKERS when set
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(workers) = config.workers {
        builder.worker_threads(workers);
    }
    let runtime = builder.build().expect("failed to build tokio runtime");

    runtime.block_on(run(config, pool_config));
}

async fn run(config: Config, pool_config: PoolConfig) {
    // 3. Create the connection pool before accepting traffic
    let pool = Arc::new(ConnectionPool::new(pool_config));
    pool.init()
        .await
        .expect("failed to initialize connection pool");

    let store = PostgresBenchStore::new(pool.clone());
    match store.probe().await {
        Ok(()) => tracing::info!("database reachable"),
        Err(err) => tracing::warn!(
            error = %err,
            "database probe failed, db routes will return errors until it is reachable"
        ),
    }

    // 4. Build the application
    let app = bench_api::create_app(bench_api::AppState::new(store));

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, workers = ?config.workers, "starting benchmark server");

    // 6. The pool is closed once serving stops, cleanly or not
    match bench_api::serve_until(&addr, app, &pool, shutdown_signal()).await {
        Ok(()) => tracing::info!("server shut down gracefully"),
        Err(err) => {
            tracing::error!(error = %err, "server error");
            std::process::exit(1);
        }
    }
}

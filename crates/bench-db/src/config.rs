//! Pool configuration loaded from environment variables.

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

pub const DEFAULT_DB_HOST: &str = "bench-postgres";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DB_NAME: &str = "bench";
pub const DB_USER: &str = "bench";
pub const DB_PASSWORD: &str = "bench";
pub const MIN_CONNECTIONS: u32 = 5;
pub const MAX_CONNECTIONS: u32 = 15;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool configuration.
///
/// Reads from environment variables:
/// - `DB_HOST` — database host (default: `"bench-postgres"`)
/// - `DB_PORT` — database port (default: `5432`)
/// - `DB_ACQUIRE_TIMEOUT_MS` — max wait for a pooled connection (default: `5000`)
/// - `DB_QUERY_TIMEOUT_MS` — max duration of a single query (default: `5000`)
///
/// Database name, credentials and pool bounds are fixed.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub query_timeout: Duration,
}

impl PoolConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Missing or unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            host: lookup("DB_HOST")
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port: lookup("DB_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_DB_PORT),
            acquire_timeout: millis("DB_ACQUIRE_TIMEOUT_MS", DEFAULT_ACQUIRE_TIMEOUT),
            query_timeout: millis("DB_QUERY_TIMEOUT_MS", DEFAULT_QUERY_TIMEOUT),
            ..Self::default()
        }
    }

    /// Returns a config pointing at `host:port` with every other value at its default.
    pub fn for_endpoint(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Returns the driver connect options for this configuration.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(&self.password)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            database: DB_NAME.to_string(),
            username: DB_USER.to_string(),
            password: DB_PASSWORD.to_string(),
            min_connections: MIN_CONNECTIONS,
            max_connections: MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

//! Connection and pool options shared by the steady-state pool and the
//! bootstrap pool.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

use crate::config::DatabaseConfig;

/// Maximum concurrent connections per pool
pub const MAX_CONNECTIONS: u32 = 10;

/// Idle connections are closed after this long
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Waiting for a free connection fails after this long
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// Capacity and timeouts applied to every pool the service builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            max_connections: MAX_CONNECTIONS,
            idle_timeout: IDLE_TIMEOUT,
            acquire_timeout: ACQUIRE_TIMEOUT,
        }
    }
}

impl PoolLimits {
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .idle_timeout(self.idle_timeout)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Build connect options for the configured target.
///
/// TLS is always required with full certificate and hostname verification.
pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(&config.password)
        .ssl_mode(PgSslMode::VerifyFull)
}

/// Describe the target without credentials, for log lines.
pub fn describe_target(options: &PgConnectOptions) -> String {
    format!(
        "postgres://{}@{}:{}/{}",
        options.get_username(),
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or_default()
    )
}

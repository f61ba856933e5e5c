//! Process-wide PostgreSQL connection pool, built on first use.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use sqlx::postgres::{PgConnectOptions, PgPool};

use crate::config::DatabaseConfig;
use crate::metrics::PoolMetrics;

use super::options::{connect_options, describe_target, PoolLimits};
use super::schema::ensure_schema;
use super::DbError;

/// Snapshot of the shared pool's connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

/// Owns the shared connection pool used by every repository call.
///
/// Construct one per process and share it through an `Arc`. The pool itself
/// is created lazily by [`PoolManager::get_connection`]; concurrent first
/// callers all observe the same instance.
pub struct PoolManager {
    options: PgConnectOptions,
    limits: PoolLimits,
    pool: OnceLock<PgPool>,
    constructed: AtomicUsize,
}

impl PoolManager {
    pub fn new(options: PgConnectOptions, limits: PoolLimits) -> Self {
        Self {
            options,
            limits,
            pool: OnceLock::new(),
            constructed: AtomicUsize::new(0),
        }
    }

    /// Manager for the configured database with the fixed pool limits.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(connect_options(config), PoolLimits::default())
    }

    /// Get the shared pool, creating it on the first call.
    ///
    /// Creation performs no I/O and cannot fail; an unreachable or
    /// misconfigured database is reported by the first query instead.
    /// Must be called from within a Tokio runtime.
    pub fn get_connection(&self) -> &PgPool {
        self.pool.get_or_init(|| {
            let pool = self
                .limits
                .pool_options()
                .connect_lazy_with(self.options.clone());

            self.constructed.fetch_add(1, Ordering::SeqCst);
            PoolMetrics::record_constructed();

            tracing::info!(
                target_db = %self.target(),
                max_connections = self.limits.max_connections,
                "PostgreSQL connection pool initialized"
            );

            pool
        })
    }

    /// Run the idempotent schema bootstrap on a dedicated pool.
    ///
    /// The shared pool is neither created nor touched.
    pub async fn bootstrap_schema(&self) -> Result<(), DbError> {
        ensure_schema(&self.options, &self.limits).await
    }

    /// Whether the shared pool has been created yet.
    pub fn is_initialized(&self) -> bool {
        self.pool.get().is_some()
    }

    /// Number of shared pools this manager has constructed (0 or 1).
    pub fn pools_constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    /// Connection counts, if the shared pool exists.
    pub fn stats(&self) -> Option<PoolStats> {
        self.pool.get().map(|pool| PoolStats {
            size: pool.size(),
            idle: pool.num_idle(),
        })
    }

    /// Target description without credentials.
    pub fn target(&self) -> String {
        describe_target(&self.options)
    }
}

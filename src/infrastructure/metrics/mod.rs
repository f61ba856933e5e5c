//! Prometheus metrics for the greetings service.
//!
//! Covers the database-access layer:
//! - Pool lifecycle (pools constructed, open/idle connections)
//! - Query counts and latency per operation
//! - Greetings created

mod helpers;

pub use helpers::{encode_metrics, PoolMetrics, QueryMetrics, QueryTimer};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    HistogramVec, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "greetings";

lazy_static! {
    // ============================================================================
    // Pool Metrics
    // ============================================================================

    /// Shared pools constructed by the pool manager
    pub static ref DB_POOLS_CONSTRUCTED: IntCounter = register_int_counter!(
        format!("{}_db_pools_constructed_total", METRIC_PREFIX),
        "Total shared database pools constructed"
    ).unwrap();

    /// Connections currently open in the shared pool
    pub static ref DB_POOL_CONNECTIONS: IntGauge = register_int_gauge!(
        format!("{}_db_pool_connections", METRIC_PREFIX),
        "Connections currently open in the shared pool"
    ).unwrap();

    /// Idle connections in the shared pool
    pub static ref DB_POOL_IDLE_CONNECTIONS: IntGauge = register_int_gauge!(
        format!("{}_db_pool_idle_connections", METRIC_PREFIX),
        "Idle connections in the shared pool"
    ).unwrap();

    // ============================================================================
    // Query Metrics
    // ============================================================================

    /// Queries issued, by operation and outcome
    pub static ref DB_QUERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_db_queries_total", METRIC_PREFIX),
        "Total database operations",
        &["operation", "outcome"]
    ).unwrap();

    /// Query latency including connection acquisition
    pub static ref DB_QUERY_DURATION: HistogramVec = register_histogram_vec!(
        format!("{}_db_query_duration_seconds", METRIC_PREFIX),
        "Database operation latency in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    ).unwrap();

    /// Greetings successfully inserted
    pub static ref GREETINGS_CREATED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_created_total", METRIC_PREFIX),
        "Total greetings created"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registered() {
        DB_QUERIES_TOTAL.with_label_values(&["list", "ok"]).inc();
        DB_QUERY_DURATION.with_label_values(&["list"]).observe(0.01);
        DB_POOL_CONNECTIONS.set(0);

        let output = encode_metrics().unwrap();
        assert!(output.contains("greetings_db_queries_total"));
        assert!(output.contains("greetings_db_query_duration_seconds"));
    }
}

//! Metrics helper structs for convenient metric recording

use std::time::Instant;

use prometheus::{Encoder, TextEncoder};

use super::{
    DB_POOLS_CONSTRUCTED, DB_POOL_CONNECTIONS, DB_POOL_IDLE_CONNECTIONS, DB_QUERIES_TOTAL,
    DB_QUERY_DURATION, GREETINGS_CREATED_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording pool metrics
pub struct PoolMetrics;

impl PoolMetrics {
    /// Record construction of the shared pool
    pub fn record_constructed() {
        DB_POOLS_CONSTRUCTED.inc();
    }

    /// Update the open/idle connection gauges
    pub fn set_connections(size: u32, idle: usize) {
        DB_POOL_CONNECTIONS.set(i64::from(size));
        DB_POOL_IDLE_CONNECTIONS.set(idle as i64);
    }
}

/// Helper struct for recording query metrics
pub struct QueryMetrics;

impl QueryMetrics {
    /// Record a finished operation
    pub fn record(operation: &str, success: bool, elapsed_secs: f64) {
        let outcome = if success { "ok" } else { "error" };
        DB_QUERIES_TOTAL
            .with_label_values(&[operation, outcome])
            .inc();
        DB_QUERY_DURATION
            .with_label_values(&[operation])
            .observe(elapsed_secs);
    }

    /// Record a newly inserted greeting
    pub fn record_created() {
        GREETINGS_CREATED_TOTAL.inc();
    }
}

/// Measures one database operation from creation to `finish`.
pub struct QueryTimer {
    operation: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            started: Instant::now(),
        }
    }

    pub fn finish(self, success: bool) {
        QueryMetrics::record(
            self.operation,
            success,
            self.started.elapsed().as_secs_f64(),
        );
    }
}

//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DatabaseHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealthResponse {
    pub backend: String,
    pub pool_initialized: bool,
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// Reports pool state without issuing a query or creating the pool.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let pool = state.store.pool_stats();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database: DatabaseHealthResponse {
            backend: state.store.backend().to_string(),
            pool_initialized: pool.is_some(),
            pool_size: pool.map(|p| p.size).unwrap_or(0),
            idle_connections: pool.map(|p| p.idle).unwrap_or(0),
        },
    })
}

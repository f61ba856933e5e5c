use axum::{routing::get, Router};

use crate::server::AppState;

use super::greetings::{create_greeting, list_greetings, root};
use super::health::health;
use super::metrics::prometheus_metrics;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Greetings
        .route("/greetings", get(list_greetings).post(create_greeting))
}

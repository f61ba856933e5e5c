//! API layer - HTTP endpoint handlers.

mod greetings;
mod health;
mod metrics;
mod routes;

pub use greetings::{
    create_greeting, list_greetings, root, CreateGreetingRequest, CreateGreetingResponse,
    GreetingsResponse,
};
pub use health::health;
pub use metrics::prometheus_metrics;
pub use routes::api_routes;

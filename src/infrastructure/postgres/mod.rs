//! PostgreSQL persistence module.
//!
//! Provides the lazily built shared pool, the startup schema bootstrap and
//! the error taxonomy used by the data-access layer.

mod error;
pub mod options;
pub mod pool;
pub mod schema;

pub use error::DbError;
pub use options::{connect_options, PoolLimits};
pub use pool::{PoolManager, PoolStats};
pub use schema::{ensure_schema, SEED_GREETINGS};

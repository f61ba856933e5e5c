//! Storage abstraction for greetings.

use async_trait::async_trait;

use crate::postgres::{DbError, PoolStats};

use super::Greeting;

/// Backend trait for greeting storage.
///
/// Implementations must be thread-safe (`Send + Sync`) as they are shared
/// across request handlers. Failures are logged by the implementation and
/// returned unchanged; no retries happen at this layer.
#[async_trait]
pub trait GreetingStore: Send + Sync {
    /// Backend type identifier
    fn backend(&self) -> &'static str;

    /// All greetings, most recent first. Never fails on an empty table.
    async fn list_greetings(&self) -> Result<Vec<Greeting>, DbError>;

    /// Insert `text` as-is and return the stored row.
    ///
    /// The caller is responsible for trimming and validating `text`.
    async fn create_greeting(&self, text: &str) -> Result<Greeting, DbError>;

    /// Connection counts for backends that hold a pool.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}

//! PostgreSQL-backed greeting repository.
//!
//! Every call runs a single statement on the pool manager's shared pool. No
//! transactions, retries or query timeouts: only waiting for a connection is
//! bounded, by the pool's acquire timeout.

use std::sync::Arc;

use async_trait::async_trait;

use crate::metrics::{QueryMetrics, QueryTimer};
use crate::postgres::{DbError, PoolManager, PoolStats};

use super::{Greeting, GreetingStore};

/// Newest first; rows without a timestamp lead, and ids break ties between
/// rows inserted by one statement.
const LIST_GREETINGS: &str =
    "SELECT Id, Text, CreatedAt FROM Greetings ORDER BY CreatedAt DESC NULLS FIRST, Id DESC";

const INSERT_GREETING: &str =
    "INSERT INTO Greetings (Text) VALUES ($1) RETURNING Id, Text, CreatedAt";

pub struct PostgresGreetingStore {
    pools: Arc<PoolManager>,
}

impl PostgresGreetingStore {
    pub fn new(pools: Arc<PoolManager>) -> Self {
        Self { pools }
    }

    pub fn pool_manager(&self) -> &Arc<PoolManager> {
        &self.pools
    }
}

#[async_trait]
impl GreetingStore for PostgresGreetingStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_greetings(&self) -> Result<Vec<Greeting>, DbError> {
        let timer = QueryTimer::start("list");

        let result = sqlx::query_as::<_, Greeting>(LIST_GREETINGS)
            .fetch_all(self.pools.get_connection())
            .await;
        timer.finish(result.is_ok());

        result.map_err(|e| {
            let err = DbError::from_query(e);
            tracing::error!(error = %err, "Error fetching greetings");
            err
        })
    }

    async fn create_greeting(&self, text: &str) -> Result<Greeting, DbError> {
        let timer = QueryTimer::start("create");

        let result = sqlx::query_as::<_, Greeting>(INSERT_GREETING)
            .bind(text)
            .fetch_one(self.pools.get_connection())
            .await;
        timer.finish(result.is_ok());

        match result {
            Ok(greeting) => {
                QueryMetrics::record_created();
                tracing::debug!(id = greeting.id, "Greeting created");
                Ok(greeting)
            }
            Err(e) => {
                let err = DbError::from_query(e);
                tracing::error!(error = %err, "Error creating greeting");
                Err(err)
            }
        }
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        self.pools.stats()
    }
}

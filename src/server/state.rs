use std::sync::Arc;
use std::time::Instant;

use crate::greetings::{GreetingStore, PostgresGreetingStore};
use crate::postgres::PoolManager;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GreetingStore>,
    pub start_time: Instant,
}

impl AppState {
    /// State backed by the shared PostgreSQL pool.
    pub fn new(pools: Arc<PoolManager>) -> Self {
        Self::with_store(Arc::new(PostgresGreetingStore::new(pools)))
    }

    pub fn with_store(store: Arc<dyn GreetingStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}

//! In-memory greeting store.
//!
//! Mirrors the PostgreSQL ordering and id semantics. Useful for tests and for
//! exercising the HTTP layer without a database.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::postgres::{DbError, SEED_GREETINGS};

use super::{Greeting, GreetingStore};

#[derive(Default)]
struct Inner {
    rows: Vec<Greeting>,
    next_id: i32,
}

#[derive(Default)]
pub struct MemoryGreetingStore {
    inner: RwLock<Inner>,
}

impl MemoryGreetingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the same rows the schema bootstrap seeds.
    pub async fn seeded() -> Self {
        let store = Self::new();
        for text in SEED_GREETINGS {
            store.insert(text).await;
        }
        store
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn insert(&self, text: &str) -> Greeting {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let greeting = Greeting {
            id: inner.next_id,
            text: text.to_string(),
            created_at: Some(Utc::now().naive_utc()),
        };
        inner.rows.push(greeting.clone());
        greeting
    }
}

/// Same order as the SQL listing: missing timestamps first, then descending
/// time, then descending id.
fn newest_first(a: &Greeting, b: &Greeting) -> Ordering {
    let by_time = match (a.created_at, b.created_at) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x),
    };
    by_time.then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl GreetingStore for MemoryGreetingStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_greetings(&self) -> Result<Vec<Greeting>, DbError> {
        let mut rows = self.inner.read().await.rows.clone();
        rows.sort_by(newest_first);
        Ok(rows)
    }

    async fn create_greeting(&self, text: &str) -> Result<Greeting, DbError> {
        Ok(self.insert(text).await)
    }
}

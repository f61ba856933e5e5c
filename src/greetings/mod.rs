//! Greetings domain: the persisted entity and the stores that hold it.
//!
//! - `PostgresGreetingStore`: repository over the shared PostgreSQL pool
//! - `MemoryGreetingStore`: in-process store with the same semantics

pub mod memory_store;
mod model;
pub mod postgres_store;
mod store;

pub use memory_store::MemoryGreetingStore;
pub use model::{normalize_text, Greeting, TextRejection, MAX_TEXT_LEN};
pub use postgres_store::PostgresGreetingStore;
pub use store::GreetingStore;

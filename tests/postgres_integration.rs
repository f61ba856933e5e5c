//! Integration tests against a real PostgreSQL database.
//!
//! These tests drop and recreate the `greetings` table, so point them at a
//! disposable database. When none is reachable each test prints a notice and
//! returns.
//!
//! Environment variables (with defaults):
//! - TEST_DB_HOST: localhost
//! - TEST_DB_PORT: 5432
//! - TEST_DB_NAME: postgres
//! - TEST_DB_USER: postgres
//! - TEST_DB_PASSWORD: postgres

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{ConnectOptions, Connection};
use tokio::sync::Mutex;

use greetings_service::greetings::{GreetingStore, PostgresGreetingStore};
use greetings_service::postgres::{ensure_schema, PoolLimits, PoolManager, SEED_GREETINGS};

/// Tests share one table; run them one at a time.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Local test databases rarely have certificates, so TLS is optional here.
fn test_options() -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()))
        .port(
            std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5432),
        )
        .database(&std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "postgres".to_string()))
        .username(&std::env::var("TEST_DB_USER").unwrap_or_else(|_| "postgres".to_string()))
        .password(&std::env::var("TEST_DB_PASSWORD").unwrap_or_else(|_| "postgres".to_string()))
        .ssl_mode(PgSslMode::Prefer)
}

/// Drop the table and return connect options, or `None` when no database
/// is reachable.
async fn fresh_database() -> Option<PgConnectOptions> {
    let options = test_options();
    let mut conn = match options.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Skipping test: Database not available - {}", e);
            return None;
        }
    };

    sqlx::query("DROP TABLE IF EXISTS Greetings")
        .execute(&mut conn)
        .await
        .expect("Failed to drop greetings table");
    let _ = conn.close().await;

    Some(options)
}

async fn row_count(options: &PgConnectOptions) -> i64 {
    let mut conn = options.connect().await.unwrap();
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM Greetings")
        .fetch_one(&mut conn)
        .await
        .unwrap();
    let _ = conn.close().await;
    count
}

fn store_for(options: &PgConnectOptions) -> PostgresGreetingStore {
    let manager = PoolManager::new(options.clone(), PoolLimits::default());
    PostgresGreetingStore::new(Arc::new(manager))
}

// =============================================================================
// Schema Bootstrap
// =============================================================================

#[tokio::test]
async fn test_fresh_database_is_seeded_and_listed_newest_first() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };

    ensure_schema(&options, &PoolLimits::default()).await.unwrap();

    let store = store_for(&options);
    let texts: Vec<String> = store
        .list_greetings()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.text)
        .collect();

    let mut expected: Vec<String> = SEED_GREETINGS.iter().map(|s| s.to_string()).collect();
    expected.reverse();
    assert_eq!(texts, expected);
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };

    ensure_schema(&options, &PoolLimits::default()).await.unwrap();
    let after_first = row_count(&options).await;

    ensure_schema(&options, &PoolLimits::default()).await.unwrap();
    let after_second = row_count(&options).await;

    assert_eq!(after_first, 4);
    assert_eq!(after_second, after_first);
}

#[tokio::test]
async fn test_bootstrap_skips_seed_on_non_empty_table() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };

    ensure_schema(&options, &PoolLimits::default()).await.unwrap();
    let mut conn = options.connect().await.unwrap();
    sqlx::query("DELETE FROM Greetings").execute(&mut conn).await.unwrap();
    sqlx::query("INSERT INTO Greetings (Text) VALUES ('only one')")
        .execute(&mut conn)
        .await
        .unwrap();
    let _ = conn.close().await;

    ensure_schema(&options, &PoolLimits::default()).await.unwrap();
    assert_eq!(row_count(&options).await, 1);
}

#[tokio::test]
async fn test_bootstrap_leaves_shared_pool_untouched() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };

    let manager = PoolManager::new(options, PoolLimits::default());
    manager.bootstrap_schema().await.unwrap();

    assert!(!manager.is_initialized());
    assert_eq!(manager.pools_constructed(), 0);
}

// =============================================================================
// Repository
// =============================================================================

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };
    ensure_schema(&options, &PoolLimits::default()).await.unwrap();

    let store = store_for(&options);
    // Allow for clock skew between this host and the database server
    let started = Utc::now().naive_utc() - chrono::Duration::seconds(5);

    let created = store.create_greeting("Hi there").await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.text, "Hi there");
    assert!(created.created_at.is_some_and(|at| at >= started));

    let listed = store.list_greetings().await.unwrap();
    assert!(listed.iter().any(|g| g.id == created.id && g.text == "Hi there"));
    assert_eq!(listed[0], created);
}

#[tokio::test]
async fn test_list_orders_by_insertion_time_descending() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };
    ensure_schema(&options, &PoolLimits::default()).await.unwrap();

    let store = store_for(&options);
    let mut ids = Vec::new();
    for text in ["t1", "t2", "t3"] {
        ids.push(store.create_greeting(text).await.unwrap().id);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(ids[0] < ids[1] && ids[1] < ids[2]);

    let texts: Vec<String> = store
        .list_greetings()
        .await
        .unwrap()
        .into_iter()
        .take(3)
        .map(|g| g.text)
        .collect();
    assert_eq!(texts, vec!["t3", "t2", "t1"]);
}

#[tokio::test]
async fn test_rows_without_timestamp_list_first() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };
    ensure_schema(&options, &PoolLimits::default()).await.unwrap();

    let store = store_for(&options);
    let created = store.create_greeting("stamped").await.unwrap();

    let mut conn = options.connect().await.unwrap();
    sqlx::query("INSERT INTO Greetings (Text, CreatedAt) VALUES ('legacy', NULL)")
        .execute(&mut conn)
        .await
        .unwrap();
    let _ = conn.close().await;

    let listed = store.list_greetings().await.unwrap();
    assert_eq!(listed.len(), SEED_GREETINGS.len() + 2);
    assert_eq!(listed[0].text, "legacy");
    assert!(listed[0].created_at.is_none());
    assert_eq!(listed[1], created);
}

#[tokio::test]
async fn test_repository_inserts_empty_text_verbatim() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };
    ensure_schema(&options, &PoolLimits::default()).await.unwrap();

    let store = store_for(&options);
    let created = store.create_greeting("").await.unwrap();
    assert_eq!(created.text, "");
}

#[tokio::test]
async fn test_text_over_column_limit_is_query_error() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };
    ensure_schema(&options, &PoolLimits::default()).await.unwrap();

    let store = store_for(&options);
    let err = store.create_greeting(&"a".repeat(501)).await.unwrap_err();
    assert!(!err.is_connection());
}

#[tokio::test]
async fn test_list_without_table_is_query_error() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };

    let store = store_for(&options);
    let err = store.list_greetings().await.unwrap_err();
    assert!(!err.is_connection());
}

// =============================================================================
// Pool Manager
// =============================================================================

#[tokio::test]
async fn test_concurrent_queries_share_one_pool() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };
    ensure_schema(&options, &PoolLimits::default()).await.unwrap();

    let store = Arc::new(store_for(&options));
    let results = join_all((0..25).map(|_| {
        let store = store.clone();
        async move { store.list_greetings().await }
    }))
    .await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(store.pool_manager().pools_constructed(), 1);

    let stats = store.pool_stats().unwrap();
    assert!(stats.size <= 10);
}

#[tokio::test]
async fn test_exhausted_pool_times_out_on_acquire() {
    let _guard = DB_LOCK.lock().await;
    let Some(options) = fresh_database().await else { return };
    ensure_schema(&options, &PoolLimits::default()).await.unwrap();

    let store = store_for(&options);
    let pool = store.pool_manager().get_connection();

    let mut held = Vec::new();
    for _ in 0..10 {
        held.push(pool.acquire().await.unwrap());
    }

    let started = Instant::now();
    let err = store.list_greetings().await.unwrap_err();
    let waited = started.elapsed();

    assert!(err.is_connection());
    assert!(waited >= Duration::from_millis(1500), "waited {:?}", waited);
    assert!(waited < Duration::from_secs(10), "waited {:?}", waited);

    drop(held);
    assert!(store.list_greetings().await.is_ok());
}

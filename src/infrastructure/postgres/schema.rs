//! Idempotent schema bootstrap for the greetings table.
//!
//! Identifiers are left unquoted so PostgreSQL folds them to lower case
//! (`greetings`, `id`, `text`, `createdat`), matching existing deployments.

use sqlx::postgres::{PgConnectOptions, PgPool};
use sqlx::{Postgres, QueryBuilder};

use crate::metrics::QueryTimer;

use super::options::PoolLimits;
use super::DbError;

pub const CREATE_GREETINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Greetings (
    Id SERIAL PRIMARY KEY,
    Text VARCHAR(500) NOT NULL,
    CreatedAt TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Rows inserted when the table is found empty, in insertion order.
pub const SEED_GREETINGS: [&str; 4] = [
    "Hello, World!",
    "Welcome to Azure PostgreSQL!",
    "Good morning!",
    "Have a great day!",
];

/// Ensure the greetings table exists and holds the seed rows when empty.
///
/// Runs on its own short-lived pool built from `options` and `limits`, which
/// is closed before returning whether or not bootstrap succeeded. Safe to run
/// on every start.
pub async fn ensure_schema(options: &PgConnectOptions, limits: &PoolLimits) -> Result<(), DbError> {
    let pool = limits.pool_options().connect_lazy_with(options.clone());
    let timer = QueryTimer::start("schema");

    let result = bootstrap(&pool).await;
    pool.close().await;
    timer.finish(result.is_ok());

    match result {
        Ok(seeded) => {
            tracing::debug!(seeded, "Schema bootstrap complete, bootstrap pool closed");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Error creating tables");
            Err(DbError::Schema(e))
        }
    }
}

/// Returns the number of seed rows inserted.
async fn bootstrap(pool: &PgPool) -> Result<u64, sqlx::Error> {
    sqlx::query(CREATE_GREETINGS_TABLE).execute(pool).await?;
    tracing::info!("Database tables checked/created successfully");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Greetings")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(0);
    }

    let inserted = seed_query().build().execute(pool).await?.rows_affected();
    tracing::info!(rows = inserted, "Sample data inserted into Greetings table");

    Ok(inserted)
}

/// Single multi-row insert so the seed rows land atomically and receive
/// ascending ids in list order.
fn seed_query() -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("INSERT INTO Greetings (Text) ");
    builder.push_values(SEED_GREETINGS, |mut row, text| {
        row.push_bind(text);
    });
    builder
}

//! Failure kinds surfaced by the database-access layer.

use thiserror::Error;

/// Errors returned by the pool manager, schema bootstrap and repository.
///
/// The wrapped `sqlx::Error` is passed through untouched so callers can
/// inspect the original cause.
#[derive(Debug, Error)]
pub enum DbError {
    /// No usable connection: acquire timeout, TLS, credentials, network
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Table creation or seeding failed during startup
    #[error("Schema initialization error: {0}")]
    Schema(#[source] sqlx::Error),

    /// The statement itself failed
    #[error("Query error: {0}")]
    Query(#[source] sqlx::Error),
}

impl DbError {
    /// Classify an error raised while running a steady-state query.
    pub fn from_query(err: sqlx::Error) -> Self {
        if is_connection_failure(&err) {
            DbError::Connection(err)
        } else {
            DbError::Query(err)
        }
    }

    /// Whether the failure means the store was unreachable rather than the
    /// statement being rejected.
    pub fn is_connection(&self) -> bool {
        match self {
            DbError::Connection(_) => true,
            DbError::Schema(e) => is_connection_failure(e),
            DbError::Query(_) => false,
        }
    }
}

fn is_connection_failure(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_) => true,
        sqlx::Error::Database(db) => db
            .code()
            .map(|code| is_connection_sqlstate(&code))
            .unwrap_or(false),
        _ => false,
    }
}

/// SQLSTATE classes 08 (connection exception) and 28 (invalid authorization),
/// plus the 57P0x server shutdown codes.
fn is_connection_sqlstate(code: &str) -> bool {
    code.starts_with("08") || code.starts_with("28") || code.starts_with("57P0")
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::greetings::TextRejection;
use crate::postgres::DbError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] TextRejection),

    /// A store failure, with the summary shown to clients
    #[error("{summary}: {source}")]
    Database {
        summary: &'static str,
        #[source]
        source: DbError,
    },
}

impl AppError {
    pub fn database(summary: &'static str, source: DbError) -> Self {
        AppError::Database { summary, source }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match &self {
            AppError::Validation(rejection) => {
                (StatusCode::BAD_REQUEST, rejection.to_string(), None)
            }
            AppError::Database { summary, source } => {
                let status = if source.is_connection() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, summary.to_string(), Some(source.to_string()))
            }
        };

        // Failures were logged by the store; only the detail shown differs
        let message = if is_production() {
            detail.map(|_| "Internal server error".to_string())
        } else {
            detail
        };

        let body = ErrorResponse {
            success: false,
            error,
            message,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

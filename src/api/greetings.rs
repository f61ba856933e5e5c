//! Greeting endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::greetings::{normalize_text, Greeting, TextRejection};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGreetingRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GreetingsResponse {
    pub success: bool,
    pub data: Vec<Greeting>,
}

#[derive(Debug, Serialize)]
pub struct CreateGreetingResponse {
    pub success: bool,
    pub data: Greeting,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
}

/// GET / - service banner
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Azure SQL Greetings API".to_string(),
        status: "running".to_string(),
    })
}

/// GET /greetings - all greetings, newest first
#[tracing::instrument(name = "http.list_greetings", skip(state))]
pub async fn list_greetings(State(state): State<AppState>) -> Result<Json<GreetingsResponse>> {
    let greetings = state
        .store
        .list_greetings()
        .await
        .map_err(|e| AppError::database("Failed to fetch greetings", e))?;

    Ok(Json(GreetingsResponse {
        success: true,
        data: greetings,
    }))
}

/// POST /greetings - store the trimmed text of a new greeting
///
/// A body that is not a JSON object with a string `text` is treated the same
/// as missing text.
#[tracing::instrument(name = "http.create_greeting", skip(state, payload))]
pub async fn create_greeting(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateGreetingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateGreetingResponse>)> {
    let Ok(Json(request)) = payload else {
        return Err(TextRejection::Missing.into());
    };
    let text = normalize_text(request.text.as_deref())?;

    let greeting = state
        .store
        .create_greeting(&text)
        .await
        .map_err(|e| AppError::database("Failed to create greeting", e))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGreetingResponse {
            success: true,
            data: greeting,
            message: "Greeting created successfully".to_string(),
        }),
    ))
}

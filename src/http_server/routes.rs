//! Built-in HTTP Routes
//!
//! Home redirect, health check and the not-found fallback. Domain routes
//! are merged in by the embedding binary.

use axum::{
    extract::State,
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::failure::Failure;

use super::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn builtin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
}

/// `GET /` redirects to the configured home page
async fn home_handler(State(state): State<AppState>) -> Result<Response, Failure> {
    let location = HeaderValue::from_str(&state.config.home_url)
        .map_err(|e| Failure::generic(format!("invalid home_url: {}", e)))?;
    Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Unmatched routes get the standard 404 error document
pub async fn not_found_fallback() -> Failure {
    Failure::not_found("Page not found")
}

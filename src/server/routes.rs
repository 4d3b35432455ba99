//! HTTP route handlers for the relay API.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::protocol::{ChatRequest, ChatResponse, HealthResponse};

use super::error::RelayError;
use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .with_state(state)
}

/// Liveness probe. Succeeds whenever the process is up; it does not
/// verify upstream reachability.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Relay one chat turn to the Gemini API.
///
/// Validation happens before any upstream call: an empty message is a
/// 400, a missing credential a 500. Upstream failure statuses are
/// mirrored verbatim, never retried.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, RelayError> {
    if request.message.trim().is_empty() {
        return Err(RelayError::EmptyMessage);
    }

    let gemini = state.gemini.as_ref().ok_or(RelayError::MissingApiKey)?;
    let reply = gemini.generate(&request.message).await?;

    Ok(Json(ChatResponse {
        success: true,
        message: reply.text,
        usage: reply.usage,
    }))
}

//! Handler for the `/chat` help assistant.

use axum::extract::State;
use axum::Json;
use evently_ai::chat;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// Assistant reply.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat
///
/// One-shot help-assistant exchange; no conversation state is kept.
pub async fn ask(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let message = input
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::BadRequest("Message is required".into()))?;

    let reply = chat(&state.ai, message).await?;
    Ok(Json(ChatResponse { reply }))
}

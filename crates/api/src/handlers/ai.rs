//! Handlers for the `/ai` resource: caption generation and posting-time
//! suggestions. Caption generation never fails outright; when no key works
//! it falls back to the deterministic template.

use axum::extract::State;
use axum::Json;
use evently_ai::{generate_caption, suggest_posting_time, EventBrief, PostingTimeSuggestion};
use evently_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for both AI endpoints: the event facts the prompts are
/// built from.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventBriefRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Event type is required"))]
    pub event_type: String,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "Audience is required"))]
    pub audience: String,
    pub date: Timestamp,
    pub resource_person: Option<String>,
    pub tone: Option<String>,
    pub custom_prompt: Option<String>,
}

impl EventBriefRequest {
    fn into_brief(self) -> EventBrief {
        EventBrief {
            title: self.title,
            event_type: self.event_type,
            department: self.department,
            audience: self.audience,
            date: self.date,
            resource_person: self.resource_person,
            tone: self.tone,
            custom_prompt: self.custom_prompt,
        }
    }
}

/// Response for `POST /ai/generate`.
#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub instagram: String,
    pub hashtags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/ai/generate
///
/// Generate a caption for the event. Hashtags ride inside the caption
/// text; the separate list stays empty for response-shape compatibility.
pub async fn generate(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<EventBriefRequest>,
) -> AppResult<Json<CaptionResponse>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let caption = generate_caption(&state.ai, &input.into_brief()).await;
    Ok(Json(CaptionResponse {
        instagram: caption,
        hashtags: Vec::new(),
    }))
}

/// POST /api/ai/suggest-time
///
/// Ask the model for the best slot to publish the event post.
pub async fn suggest_time(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<EventBriefRequest>,
) -> AppResult<Json<PostingTimeSuggestion>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let suggestion = suggest_posting_time(&state.ai, &input.into_brief()).await?;
    Ok(Json(suggestion))
}

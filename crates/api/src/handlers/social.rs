//! Handlers for the `/social` resource: publish now or schedule for the
//! background sweep. Both endpoints are admin-only and platform-generic;
//! the platform comes from the URL.

use axum::extract::{Path, State};
use axum::Json;
use evently_core::approval::ApprovalStatus;
use evently_core::error::CoreError;
use evently_core::social::Platform;
use evently_core::timeline::ACTOR_ADMIN;
use evently_core::types::{DbId, Timestamp};
use evently_db::models::event::Event;
use evently_db::models::social_post::SocialPost;
use evently_db::repositories::{EventRepo, SocialPostRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::publish::{publish_post, resolve_caption, PublishTrigger};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /social/{platform}/{id}`. The caption override is
/// optional; without it the stored content or the event details are used.
#[derive(Debug, Deserialize, Default)]
pub struct PublishRequest {
    pub caption: Option<String>,
}

/// Request body for `POST /social/{platform}/schedule/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub scheduled_at: Option<Timestamp>,
    pub content: Option<String>,
}

/// Response for both endpoints: a human-readable message plus the updated
/// publish record.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub message: String,
    pub post: SocialPost,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/social/{platform}/{id}
///
/// Publish an approved event to one platform immediately. The publish
/// record's terminal flag makes this a once-only operation per platform.
pub async fn publish(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path((platform, id)): Path<(String, DbId)>,
    body: Option<Json<PublishRequest>>,
) -> AppResult<Json<PublishResponse>> {
    let platform: Platform = platform.parse()?;
    let input = body.map(|Json(b)| b).unwrap_or_default();

    let event = fetch_approved_event(&state, id).await?;
    let post = fetch_post(&state, id, platform).await?;
    if post.posted {
        return Err(AppError::Core(CoreError::Conflict(
            "Event already published".into(),
        )));
    }

    let caption = resolve_caption(input.caption.as_deref(), &post.content, &event.details)
        .ok_or_else(|| {
            AppError::BadRequest(format!("{} content missing", platform.display_name()))
        })?;

    let post = publish_post(
        &state.pool,
        &state.publishers,
        state.config.public_url.as_deref(),
        id,
        platform,
        &event.images,
        &caption,
        PublishTrigger::Manual,
    )
    .await?;

    tracing::info!(
        event_id = id,
        platform = %platform,
        user_id = user.user_id,
        "Event published"
    );
    Ok(Json(PublishResponse {
        message: format!("Posted to {} successfully", platform.display_name()),
        post,
    }))
}

/// POST /api/social/{platform}/schedule/{id}
///
/// Schedule a post for the background sweep, optionally replacing the
/// stored caption. Scheduling a posted record is a 409.
pub async fn schedule(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path((platform, id)): Path<(String, DbId)>,
    Json(input): Json<ScheduleRequest>,
) -> AppResult<Json<PublishResponse>> {
    let platform: Platform = platform.parse()?;
    let scheduled_at = input
        .scheduled_at
        .ok_or_else(|| AppError::BadRequest("Schedule date & time required".into()))?;

    fetch_approved_event(&state, id).await?;

    let post = SocialPostRepo::schedule(
        &state.pool,
        id,
        platform,
        scheduled_at,
        input.content.as_deref(),
        ACTOR_ADMIN,
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Conflict("Event already posted".into())))?;

    tracing::info!(
        event_id = id,
        platform = %platform,
        user_id = user.user_id,
        scheduled_at = %scheduled_at,
        "Post scheduled"
    );
    Ok(Json(PublishResponse {
        message: format!(
            "Scheduled for {} on {}",
            platform.display_name(),
            scheduled_at.format("%a, %b %d, %Y %H:%M UTC")
        ),
        post,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the event and require it to be APPROVED; publishing and scheduling
/// are both gated on HOD approval.
async fn fetch_approved_event(state: &AppState, id: DbId) -> AppResult<Event> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }))?;

    let status: ApprovalStatus = event.approval_status.parse()?;
    if status != ApprovalStatus::Approved {
        return Err(AppError::Core(CoreError::Forbidden(
            "Event must be approved before publishing".into(),
        )));
    }
    Ok(event)
}

async fn fetch_post(state: &AppState, id: DbId, platform: Platform) -> AppResult<SocialPost> {
    SocialPostRepo::find(&state.pool, id, platform)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Publish record",
            id,
        }))
}

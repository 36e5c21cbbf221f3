//! Handlers for the `/approval` resource: the HOD approval workflow.
//!
//! Sending is authenticated; the review page and the approve/reject
//! decisions are public because the HOD reaches them from an emailed link
//! without an account. Decisions are guarded by the state machine in
//! `evently_core::approval` plus the derived expiry check, and every
//! notification email is best-effort: a failed send is logged but never
//! rolls back the transition.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use evently_core::approval::{is_expired, ApprovalStatus, APPROVAL_WINDOW_HOURS};
use evently_core::error::CoreError;
use evently_core::types::DbId;
use evently_db::models::event::Event;
use evently_db::models::timeline::TimelineEntry;
use evently_db::repositories::{EventRepo, TimelineRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_magic_link_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /approval/send/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendApprovalRequest {
    #[validate(email(message = "A valid HOD email address is required"))]
    pub hod_email: String,
}

/// Request body for `POST /approval/reject/{id}`.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// Response for `GET /approval/event/{id}`: the event, its full timeline,
/// and the derived expiry flag for the review page.
#[derive(Debug, Serialize)]
pub struct ApprovalView {
    #[serde(flatten)]
    pub event: Event,
    pub timeline: Vec<TimelineEntry>,
    #[serde(rename = "isExpired")]
    pub is_expired: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/approval/send/{id}
///
/// Transition the event to SENT and email the HOD a review link. Allowed
/// from every status except APPROVED, so a rejected or expired request can
/// simply be re-sent.
pub async fn send(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SendApprovalRequest>,
) -> AppResult<Json<ApprovalView>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let event = fetch_event(&state, id).await?;
    let status: ApprovalStatus = event.approval_status.parse()?;
    if !status.can_send() {
        return Err(AppError::Core(CoreError::Conflict(
            "Event is already approved".into(),
        )));
    }

    let event = EventRepo::mark_sent(&state.pool, id).await?;
    tracing::info!(
        event_id = id,
        user_id = user.user_id,
        hod_email = %input.hod_email,
        "Approval request sent"
    );

    // Best-effort notification: the transition stands even if the email
    // cannot be delivered (the admin can re-send).
    if let Some(mailer) = &state.mailer {
        let review_url = format!("{}/hod/approve/{id}", state.config.frontend_url);
        if let Err(err) = mailer
            .send_approval_request(&input.hod_email, &event, &review_url)
            .await
        {
            tracing::warn!(event_id = id, error = %err, "Approval request email failed");
        }
    } else {
        tracing::warn!(event_id = id, "Email not configured, approval email skipped");
    }

    approval_view(&state, event).await.map(Json)
}

/// GET /api/approval/event/{id}
///
/// Public review page data: event, timeline, and whether the pending
/// request has expired.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApprovalView>> {
    let event = fetch_event(&state, id).await?;
    approval_view(&state, event).await.map(Json)
}

/// POST /api/approval/approve/{id}
///
/// Public HOD decision. Only a SENT, unexpired request can be approved;
/// success notifies the admin with a magic-link publish button.
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApprovalView>> {
    let event = fetch_event(&state, id).await?;
    check_decidable(&state, &event).await?;

    let event = EventRepo::mark_approved(&state.pool, id).await?;
    tracing::info!(event_id = id, "Event approved by HOD");

    notify_admin_approved(&state, &event).await;

    approval_view(&state, event).await.map(Json)
}

/// POST /api/approval/reject/{id}
///
/// Public HOD decision. Requires a non-empty reason; the reason is stored
/// on the event, recorded in the timeline, and quoted in the notification.
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<ApprovalView>> {
    let reason = input
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::BadRequest("Reject reason required".into()))?;

    let event = fetch_event(&state, id).await?;
    check_decidable(&state, &event).await?;

    let event = EventRepo::mark_rejected(&state.pool, id, reason).await?;
    tracing::info!(event_id = id, reason, "Event rejected by HOD");

    notify_admin_rejected(&state, &event, reason).await;

    approval_view(&state, event).await.map(Json)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_event(state: &AppState, id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }))
}

/// Reject a decision unless the event is SENT and inside the approval
/// window. An expired request needs a fresh send before it can be decided.
async fn check_decidable(state: &AppState, event: &Event) -> AppResult<()> {
    let status: ApprovalStatus = event.approval_status.parse()?;
    if !status.can_decide() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Event is {status}, only a SENT event can be approved or rejected"
        ))));
    }

    let last_sent_at = TimelineRepo::latest_sent_at(&state.pool, event.id).await?;
    if is_expired(status, last_sent_at, Utc::now()) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Approval window has expired ({APPROVAL_WINDOW_HOURS} hours). \
             Ask the admin to re-send the request."
        ))));
    }
    Ok(())
}

async fn approval_view(state: &AppState, event: Event) -> AppResult<ApprovalView> {
    let status: ApprovalStatus = event.approval_status.parse()?;
    let timeline = TimelineRepo::list_for_event(&state.pool, event.id).await?;
    let last_sent_at = TimelineRepo::latest_sent_at(&state.pool, event.id).await?;
    Ok(ApprovalView {
        is_expired: is_expired(status, last_sent_at, Utc::now()),
        event,
        timeline,
    })
}

/// Email the admin their event was approved, with a magic-link publish
/// button that lands signed in. Every step is best-effort.
async fn notify_admin_approved(state: &AppState, event: &Event) {
    let Some(mailer) = &state.mailer else {
        tracing::warn!(event_id = event.id, "Email not configured, approval notice skipped");
        return;
    };

    let admin = match UserRepo::find_admin(&state.pool, state.config.admin_email.as_deref()).await
    {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            tracing::warn!(event_id = event.id, "No admin account found to notify");
            return;
        }
        Err(err) => {
            tracing::warn!(event_id = event.id, error = %err, "Admin lookup failed");
            return;
        }
    };

    let publish_url = match generate_magic_link_token(admin.id, &admin.role, &state.config.jwt) {
        Ok(token) => format!(
            "{}/admin/social-post/{}?token={token}",
            state.config.frontend_url, event.id
        ),
        Err(err) => {
            tracing::warn!(event_id = event.id, error = %err, "Magic-link token generation failed");
            return;
        }
    };

    if let Err(err) = mailer
        .send_approved_notice(&admin.email, event, &publish_url)
        .await
    {
        tracing::warn!(event_id = event.id, error = %err, "Approved notice email failed");
    }
}

async fn notify_admin_rejected(state: &AppState, event: &Event, reason: &str) {
    let Some(mailer) = &state.mailer else {
        tracing::warn!(event_id = event.id, "Email not configured, rejection notice skipped");
        return;
    };

    let admin = match UserRepo::find_admin(&state.pool, state.config.admin_email.as_deref()).await
    {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            tracing::warn!(event_id = event.id, "No admin account found to notify");
            return;
        }
        Err(err) => {
            tracing::warn!(event_id = event.id, error = %err, "Admin lookup failed");
            return;
        }
    };

    if let Err(err) = mailer
        .send_rejected_notice(&admin.email, event, reason)
        .await
    {
        tracing::warn!(event_id = event.id, error = %err, "Rejected notice email failed");
    }
}

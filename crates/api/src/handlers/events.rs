//! Handlers for the `/events` resource: CRUD over college events.
//!
//! Creating an event also seeds its two per-platform publish records (the
//! repository does this in one transaction), so the social endpoints always
//! find a record to work on.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use evently_core::error::CoreError;
use evently_core::social::MAX_EVENT_IMAGES;
use evently_core::types::{DbId, Timestamp};
use evently_db::models::event::{CreateEvent, Event, UpdateEvent};
use evently_db::repositories::EventRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /events`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Event type is required"))]
    pub event_type: String,
    #[validate(length(min = 1, message = "Details are required"))]
    pub details: String,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    pub date: Timestamp,
    #[validate(length(min = 1, message = "Audience is required"))]
    pub audience: String,
    pub resource_person: Option<String>,
    #[validate(length(min = 1, message = "At least one image is required"))]
    pub images: Vec<String>,
}

/// Request body for `PUT /events/{id}`. All fields optional; absent ones
/// are left unchanged.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub details: Option<String>,
    pub department: Option<String>,
    pub date: Option<Timestamp>,
    pub audience: Option<String>,
    pub resource_person: Option<String>,
    pub images: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/events
///
/// Create an event (approval status starts at DRAFT) along with its two
/// platform publish records. A duplicate title + date pair is a 409.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if input.images.len() > MAX_EVENT_IMAGES {
        return Err(AppError::BadRequest(format!(
            "At most {MAX_EVENT_IMAGES} images per event"
        )));
    }

    let event = EventRepo::create(
        &state.pool,
        &CreateEvent {
            title: input.title,
            event_type: input.event_type,
            details: input.details,
            department: input.department,
            event_date: input.date,
            audience: input.audience,
            resource_person: input.resource_person,
            images: input.images,
        },
    )
    .await?;

    tracing::info!(event_id = event.id, user_id = user.user_id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/events
pub async fn list(State(state): State<AppState>, _user: AuthUser) -> AppResult<Json<Vec<Event>>> {
    let events = EventRepo::list_all(&state.pool).await?;
    Ok(Json(events))
}

/// GET /api/events/{id}
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Event>> {
    fetch_event(&state, id).await.map(Json)
}

/// GET /api/events/public/{id}
///
/// Unauthenticated read, used by the emailed approval page.
pub async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Event>> {
    fetch_event(&state, id).await.map(Json)
}

/// PUT /api/events/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventRequest>,
) -> AppResult<Json<Event>> {
    let event = EventRepo::update(
        &state.pool,
        id,
        &UpdateEvent {
            title: input.title,
            event_type: input.event_type,
            details: input.details,
            department: input.department,
            event_date: input.date,
            audience: input.audience,
            resource_person: input.resource_person,
            images: input.images,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Event",
        id,
    }))?;
    Ok(Json(event))
}

/// DELETE /api/events/{id}
///
/// Deletes the event; timeline entries and publish records cascade.
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = EventRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }));
    }
    tracing::info!(event_id = id, "Event deleted");
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

async fn fetch_event(state: &AppState, id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }))
}

//! Event models.
//!
//! `event_type` is stored under that column name (`type` is reserved) but
//! serializes as `"type"` to match the API surface.

use evently_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub details: String,
    pub department: String,
    #[serde(rename = "date")]
    pub event_date: Timestamp,
    pub audience: String,
    pub resource_person: Option<String>,
    pub images: Vec<String>,
    pub approval_status: String,
    pub rejected_reason: String,
    pub approved_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new event.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub event_type: String,
    pub details: String,
    pub department: String,
    pub event_date: Timestamp,
    pub audience: String,
    pub resource_person: Option<String>,
    pub images: Vec<String>,
}

/// DTO for partial event updates; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub event_type: Option<String>,
    pub details: Option<String>,
    pub department: Option<String>,
    pub event_date: Option<Timestamp>,
    pub audience: Option<String>,
    pub resource_person: Option<String>,
    pub images: Option<Vec<String>>,
}

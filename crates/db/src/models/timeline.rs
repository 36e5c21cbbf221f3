//! Approval timeline models.

use evently_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `event_timeline` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimelineEntry {
    pub id: DbId,
    pub event_id: DbId,
    pub action: String,
    #[serde(rename = "by")]
    pub actor: String,
    pub reason: Option<String>,
    #[serde(rename = "at")]
    pub created_at: Timestamp,
}

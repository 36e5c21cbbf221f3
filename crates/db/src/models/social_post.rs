//! Per-platform publish record models.

use evently_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `social_posts` table: one platform's publish state for one
/// event.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocialPost {
    pub id: DbId,
    pub event_id: DbId,
    pub platform: String,
    pub content: String,
    pub status: String,
    pub scheduled_at: Option<Timestamp>,
    pub posted: bool,
    pub posted_at: Option<Timestamp>,
    pub post_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A publish record joined with the parent event fields the sweep needs.
#[derive(Debug, Clone, FromRow)]
pub struct DuePost {
    pub event_id: DbId,
    pub platform: String,
    pub content: String,
    pub title: String,
    pub details: String,
    pub images: Vec<String>,
}

//! Repository for the append-only `event_timeline` table.

use evently_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::timeline::TimelineEntry;

/// Column list for event_timeline queries.
const TIMELINE_COLUMNS: &str = "id, event_id, action, actor, reason, created_at";

/// Read and append operations for the approval timeline.
///
/// Entries are only ever inserted, and always inside the same transaction as
/// the state mutation they record -- see [`append_tx`](Self::append_tx).
pub struct TimelineRepo;

impl TimelineRepo {
    /// Append an entry inside an open transaction.
    pub async fn append_tx(
        conn: &mut PgConnection,
        event_id: DbId,
        action: &str,
        actor: &str,
        reason: Option<&str>,
    ) -> Result<TimelineEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_timeline (event_id, action, actor, reason)
             VALUES ($1, $2, $3, $4)
             RETURNING {TIMELINE_COLUMNS}"
        );
        sqlx::query_as::<_, TimelineEntry>(&query)
            .bind(event_id)
            .bind(action)
            .bind(actor)
            .bind(reason)
            .fetch_one(conn)
            .await
    }

    /// List all entries for an event, oldest first.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<TimelineEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {TIMELINE_COLUMNS} FROM event_timeline
             WHERE event_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, TimelineEntry>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Timestamp of the most recent SENT entry for an event, if any.
    ///
    /// This drives the derived approval-expiry flag.
    pub async fn latest_sent_at(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        let row: Option<(Timestamp,)> = sqlx::query_as(
            "SELECT created_at FROM event_timeline
             WHERE event_id = $1 AND action = 'SENT'
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
        )
        .bind(event_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(at,)| at))
    }
}

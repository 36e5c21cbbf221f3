//! Repository for the `events` table and its approval transitions.

use evently_core::approval::ApprovalStatus;
use evently_core::social::Platform;
use evently_core::timeline::{
    ACTION_APPROVED, ACTION_REJECTED, ACTION_SENT, ACTOR_ADMIN, ACTOR_HOD,
};
use evently_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event, UpdateEvent};
use crate::repositories::TimelineRepo;

/// Column list for events queries.
const EVENT_COLUMNS: &str = "id, title, event_type, details, department, event_date, audience, \
    resource_person, images, approval_status, rejected_reason, approved_at, rejected_at, \
    created_at, updated_at";

/// CRUD and approval-transition operations for events.
///
/// Every approval transition updates the status and appends its timeline
/// entry in one transaction, so the "exactly one entry per transition"
/// invariant cannot be broken by a partial failure.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event together with its two platform publish records.
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO events
                (title, event_type, details, department, event_date, audience,
                 resource_person, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&input.event_type)
            .bind(&input.details)
            .bind(&input.department)
            .bind(input.event_date)
            .bind(&input.audience)
            .bind(&input.resource_person)
            .bind(&input.images)
            .fetch_one(&mut *tx)
            .await?;

        for platform in Platform::all() {
            sqlx::query("INSERT INTO social_posts (event_id, platform) VALUES ($1, $2)")
                .bind(event.id)
                .bind(platform.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(event)
    }

    /// List all events, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC");
        sqlx::query_as::<_, Event>(&query).fetch_all(pool).await
    }

    /// Find an event by its id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update to the descriptive fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                event_type = COALESCE($3, event_type),
                details = COALESCE($4, details),
                department = COALESCE($5, department),
                event_date = COALESCE($6, event_date),
                audience = COALESCE($7, audience),
                resource_person = COALESCE($8, resource_person),
                images = COALESCE($9, images),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.event_type)
            .bind(&input.details)
            .bind(&input.department)
            .bind(input.event_date)
            .bind(&input.audience)
            .bind(&input.resource_person)
            .bind(&input.images)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event. Timeline entries and publish records cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition to SENT and append the `{SENT, ADMIN}` timeline entry.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<Event, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE events SET approval_status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(ApprovalStatus::Sent.as_str())
            .fetch_one(&mut *tx)
            .await?;

        TimelineRepo::append_tx(&mut *tx, id, ACTION_SENT, ACTOR_ADMIN, None).await?;

        tx.commit().await?;
        Ok(event)
    }

    /// Transition to APPROVED, set `approved_at`, and append the
    /// `{APPROVED, HOD}` timeline entry.
    pub async fn mark_approved(pool: &PgPool, id: DbId) -> Result<Event, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE events SET approval_status = $2, approved_at = NOW(), updated_at = NOW()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(ApprovalStatus::Approved.as_str())
            .fetch_one(&mut *tx)
            .await?;

        TimelineRepo::append_tx(&mut *tx, id, ACTION_APPROVED, ACTOR_HOD, None).await?;

        tx.commit().await?;
        Ok(event)
    }

    /// Transition to REJECTED with the given reason, set `rejected_at`, and
    /// append the `{REJECTED, HOD, reason}` timeline entry.
    pub async fn mark_rejected(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Event, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE events SET approval_status = $2, rejected_reason = $3,
                rejected_at = NOW(), updated_at = NOW()
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(ApprovalStatus::Rejected.as_str())
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        TimelineRepo::append_tx(&mut *tx, id, ACTION_REJECTED, ACTOR_HOD, Some(reason)).await?;

        tx.commit().await?;
        Ok(event)
    }
}

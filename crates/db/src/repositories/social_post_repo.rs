//! Repository for the `social_posts` table (per-platform publish records).

use evently_core::social::{Platform, PostStatus};
use evently_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::social_post::{DuePost, SocialPost};
use crate::repositories::TimelineRepo;

/// Column list for social_posts queries.
const POST_COLUMNS: &str = "id, event_id, platform, content, status, scheduled_at, posted, \
    posted_at, post_url, created_at, updated_at";

/// Publish-state operations. The `posted` flag is terminal: both
/// [`mark_posted`](Self::mark_posted) and [`schedule`](Self::schedule) are
/// conditional on `posted = FALSE`, so a record that has been published can
/// never be re-scheduled or re-posted.
pub struct SocialPostRepo;

impl SocialPostRepo {
    /// Find the publish record for one platform of one event.
    pub async fn find(
        pool: &PgPool,
        event_id: DbId,
        platform: Platform,
    ) -> Result<Option<SocialPost>, sqlx::Error> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM social_posts
             WHERE event_id = $1 AND platform = $2"
        );
        sqlx::query_as::<_, SocialPost>(&query)
            .bind(event_id)
            .bind(platform.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Schedule a post, optionally replacing the stored caption, and append
    /// the platform's SCHEDULED timeline entry.
    ///
    /// Returns `None` when the record is already posted (terminal) or does
    /// not exist.
    pub async fn schedule(
        pool: &PgPool,
        event_id: DbId,
        platform: Platform,
        scheduled_at: Timestamp,
        content: Option<&str>,
        actor: &str,
    ) -> Result<Option<SocialPost>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE social_posts SET
                status = $3,
                scheduled_at = $4,
                content = COALESCE($5, content),
                updated_at = NOW()
             WHERE event_id = $1 AND platform = $2 AND posted = FALSE
             RETURNING {POST_COLUMNS}"
        );
        let post = sqlx::query_as::<_, SocialPost>(&query)
            .bind(event_id)
            .bind(platform.as_str())
            .bind(PostStatus::Scheduled.as_str())
            .bind(scheduled_at)
            .bind(content)
            .fetch_optional(&mut *tx)
            .await?;

        if post.is_some() {
            TimelineRepo::append_tx(&mut *tx, event_id, platform.scheduled_action(), actor, None)
                .await?;
        }

        tx.commit().await?;
        Ok(post)
    }

    /// Compare-and-swap publish: set the terminal posted state only if the
    /// record has not been posted yet, and append the given timeline action.
    ///
    /// Returns `None` when another writer got there first (or the record is
    /// missing); callers treat that as "already published".
    pub async fn mark_posted(
        pool: &PgPool,
        event_id: DbId,
        platform: Platform,
        post_url: Option<&str>,
        action: &str,
        actor: &str,
    ) -> Result<Option<SocialPost>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE social_posts SET
                status = $3,
                posted = TRUE,
                posted_at = NOW(),
                post_url = $4,
                updated_at = NOW()
             WHERE event_id = $1 AND platform = $2 AND posted = FALSE
             RETURNING {POST_COLUMNS}"
        );
        let post = sqlx::query_as::<_, SocialPost>(&query)
            .bind(event_id)
            .bind(platform.as_str())
            .bind(PostStatus::Posted.as_str())
            .bind(post_url)
            .fetch_optional(&mut *tx)
            .await?;

        if post.is_some() {
            TimelineRepo::append_tx(&mut *tx, event_id, action, actor, None).await?;
        }

        tx.commit().await?;
        Ok(post)
    }

    /// List publish records due for the sweep: scheduled, unposted, and past
    /// their scheduled time, joined with the parent event fields needed to
    /// build the post.
    pub async fn list_due(
        pool: &PgPool,
        platform: Platform,
        now: Timestamp,
    ) -> Result<Vec<DuePost>, sqlx::Error> {
        sqlx::query_as::<_, DuePost>(
            "SELECT sp.event_id, sp.platform, sp.content, e.title, e.details, e.images
             FROM social_posts sp
             JOIN events e ON e.id = sp.event_id
             WHERE sp.platform = $1
               AND sp.status = 'SCHEDULED'
               AND sp.posted = FALSE
               AND sp.scheduled_at <= $2
             ORDER BY sp.scheduled_at ASC",
        )
        .bind(platform.as_str())
        .bind(now)
        .fetch_all(pool)
        .await
    }
}

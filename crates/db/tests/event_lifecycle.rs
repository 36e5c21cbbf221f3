//! Integration tests for the approval cycle and publish-state invariants.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use evently_core::approval::ApprovalStatus;
use evently_core::social::Platform;
use evently_core::timeline::{ACTOR_ADMIN, ACTOR_SYSTEM};
use evently_db::models::event::CreateEvent;
use evently_db::repositories::{EventRepo, SocialPostRepo, TimelineRepo};
use sqlx::PgPool;

fn sample_event(title: &str) -> CreateEvent {
    CreateEvent {
        title: title.to_string(),
        event_type: "Workshop".to_string(),
        details: "Hands-on Rust workshop for final-year students".to_string(),
        department: "CSE".to_string(),
        event_date: "2025-01-01T09:00:00Z".parse().unwrap(),
        audience: "Students".to_string(),
        resource_person: None,
        images: vec!["https://cdn.example.com/one.jpg".to_string()],
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn create_seeds_both_platform_records(pool: PgPool) {
    let event = EventRepo::create(&pool, &sample_event("T")).await.unwrap();

    assert_eq!(event.approval_status, ApprovalStatus::Draft.as_str());
    assert_eq!(event.rejected_reason, "");

    for platform in Platform::all() {
        let post = SocialPostRepo::find(&pool, event.id, platform)
            .await
            .unwrap()
            .expect("publish record should exist");
        assert_eq!(post.status, "DRAFT");
        assert!(!post.posted);
        assert!(post.post_url.is_none());
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_title_and_date_is_rejected(pool: PgPool) {
    EventRepo::create(&pool, &sample_event("Tech Fest")).await.unwrap();

    let err = EventRepo::create(&pool, &sample_event("Tech Fest"))
        .await
        .expect_err("second insert with same title+date must fail");

    assert_matches!(err, sqlx::Error::Database(db_err) => {
        assert_eq!(db_err.constraint(), Some("uq_events_title_date"));
    });
}

#[sqlx::test(migrations = "./migrations")]
async fn approval_cycle_appends_exactly_one_entry_per_transition(pool: PgPool) {
    let event = EventRepo::create(&pool, &sample_event("T")).await.unwrap();

    // Send: DRAFT -> SENT, one timeline entry.
    let event = EventRepo::mark_sent(&pool, event.id).await.unwrap();
    assert_eq!(event.approval_status, "SENT");
    let timeline = TimelineRepo::list_for_event(&pool, event.id).await.unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].action, "SENT");
    assert_eq!(timeline[0].actor, "ADMIN");

    // Reject with reason: SENT -> REJECTED, second entry carries the reason.
    let event = EventRepo::mark_rejected(&pool, event.id, "bad photo")
        .await
        .unwrap();
    assert_eq!(event.approval_status, "REJECTED");
    assert_eq!(event.rejected_reason, "bad photo");
    assert!(event.rejected_at.is_some());
    let timeline = TimelineRepo::list_for_event(&pool, event.id).await.unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[1].action, "REJECTED");
    assert_eq!(timeline[1].reason.as_deref(), Some("bad photo"));

    // Resend: REJECTED -> SENT, third entry, and latest_sent_at moves forward.
    let event = EventRepo::mark_sent(&pool, event.id).await.unwrap();
    assert_eq!(event.approval_status, "SENT");
    let timeline = TimelineRepo::list_for_event(&pool, event.id).await.unwrap();
    assert_eq!(timeline.len(), 3);

    let last_sent = TimelineRepo::latest_sent_at(&pool, event.id)
        .await
        .unwrap()
        .expect("resend must leave a SENT entry");
    assert_eq!(last_sent, timeline[2].created_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_posted_is_terminal(pool: PgPool) {
    let event = EventRepo::create(&pool, &sample_event("T")).await.unwrap();

    let post = SocialPostRepo::mark_posted(
        &pool,
        event.id,
        Platform::Instagram,
        Some("https://instagram.com/p/abc"),
        Platform::Instagram.posted_action(),
        ACTOR_ADMIN,
    )
    .await
    .unwrap()
    .expect("first publish must win the compare-and-swap");
    assert!(post.posted);
    assert_eq!(post.status, "POSTED");
    assert_eq!(post.post_url.as_deref(), Some("https://instagram.com/p/abc"));

    // A second publish attempt loses the compare-and-swap and changes nothing.
    let second = SocialPostRepo::mark_posted(
        &pool,
        event.id,
        Platform::Instagram,
        Some("https://instagram.com/p/other"),
        Platform::Instagram.auto_post_action(),
        ACTOR_SYSTEM,
    )
    .await
    .unwrap();
    assert!(second.is_none());

    let unchanged = SocialPostRepo::find(&pool, event.id, Platform::Instagram)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        unchanged.post_url.as_deref(),
        Some("https://instagram.com/p/abc")
    );
    assert_eq!(unchanged.posted_at, post.posted_at);

    // The losing attempt must not have appended a timeline entry either.
    let timeline = TimelineRepo::list_for_event(&pool, event.id).await.unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].action, "POSTED");

    // Facebook is an independent state machine on the same event.
    let fb = SocialPostRepo::find(&pool, event.id, Platform::Facebook)
        .await
        .unwrap()
        .unwrap();
    assert!(!fb.posted);
}

#[sqlx::test(migrations = "./migrations")]
async fn scheduling_is_refused_after_posting(pool: PgPool) {
    let event = EventRepo::create(&pool, &sample_event("T")).await.unwrap();

    SocialPostRepo::mark_posted(
        &pool,
        event.id,
        Platform::Facebook,
        None,
        Platform::Facebook.posted_action(),
        ACTOR_ADMIN,
    )
    .await
    .unwrap()
    .unwrap();

    let refused = SocialPostRepo::schedule(
        &pool,
        event.id,
        Platform::Facebook,
        Utc::now() + Duration::hours(1),
        None,
        ACTOR_ADMIN,
    )
    .await
    .unwrap();
    assert!(refused.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_due_matches_only_elapsed_scheduled_posts(pool: PgPool) {
    let due = EventRepo::create(&pool, &sample_event("Due")).await.unwrap();
    let future = EventRepo::create(&pool, &sample_event("Future")).await.unwrap();

    let now = Utc::now();
    SocialPostRepo::schedule(
        &pool,
        due.id,
        Platform::Instagram,
        now - Duration::minutes(5),
        Some("Caption override"),
        ACTOR_ADMIN,
    )
    .await
    .unwrap()
    .unwrap();
    SocialPostRepo::schedule(
        &pool,
        future.id,
        Platform::Instagram,
        now + Duration::hours(2),
        None,
        ACTOR_ADMIN,
    )
    .await
    .unwrap()
    .unwrap();

    let matches = SocialPostRepo::list_due(&pool, Platform::Instagram, now)
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].event_id, due.id);
    assert_eq!(matches[0].content, "Caption override");
    assert_eq!(matches[0].title, "Due");

    // Once posted, the row no longer matches the due query.
    SocialPostRepo::mark_posted(
        &pool,
        due.id,
        Platform::Instagram,
        Some("https://instagram.com/p/x"),
        Platform::Instagram.auto_post_action(),
        ACTOR_SYSTEM,
    )
    .await
    .unwrap()
    .unwrap();

    let matches = SocialPostRepo::list_due(&pool, Platform::Instagram, now)
        .await
        .unwrap();
    assert!(matches.is_empty());
}

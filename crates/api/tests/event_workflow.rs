//! Integration tests for event CRUD, the approval workflow, and the
//! publish/schedule guards, driven through the HTTP surface.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{build_test_app, create_event, register_and_login, request_json};

#[sqlx::test(migrations = "../db/migrations")]
async fn event_crud_round_trip(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "admin@college.edu").await;

    let id = create_event(&app, &token, "AI Bootcamp").await;

    let (status, body) =
        request_json(&app, "GET", &format!("/api/events/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "AI Bootcamp");
    assert_eq!(body["approval_status"], "DRAFT");
    // `event_type` serializes under the API name `type`.
    assert_eq!(body["type"], "Workshop");

    let (status, body) = request_json(
        &app,
        "PUT",
        &format!("/api/events/{id}"),
        Some(&token),
        Some(json!({ "title": "AI Bootcamp 2026" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "AI Bootcamp 2026");
    assert_eq!(body["department"], "CSE", "untouched fields survive a partial update");

    // The public read needs no token (the approval page uses it).
    let (status, _) =
        request_json(&app, "GET", &format!("/api/events/public/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        request_json(&app, "DELETE", &format!("/api/events/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        request_json(&app, "GET", &format!("/api/events/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_event_title_and_date_is_a_conflict(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "admin@college.edu").await;

    create_event(&app, &token, "Tech Fest").await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/events",
        Some(&token),
        Some(json!({
            "title": "Tech Fest",
            "type": "Fest",
            "details": "Same title, same date.",
            "department": "ECE",
            "date": "2026-09-10T09:00:00Z",
            "audience": "Students",
            "images": ["https://cdn.example.edu/other.jpg"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn approval_workflow_happy_path(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "admin@college.edu").await;
    let id = create_event(&app, &token, "Robotics Expo").await;

    // Send for approval. No mailer is configured; the transition stands.
    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/approval/send/{id}"),
        Some(&token),
        Some(json!({ "hodEmail": "hod@college.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["approval_status"], "SENT");
    assert_eq!(body["isExpired"], false);

    // The public review page sees the SENT entry in the timeline.
    let (status, body) =
        request_json(&app, "GET", &format!("/api/approval/event/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeline"][0]["action"], "SENT");
    assert_eq!(body["timeline"][0]["by"], "ADMIN");

    // HOD approves (public, from the emailed link).
    let (status, body) =
        request_json(&app, "POST", &format!("/api/approval/approve/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["approval_status"], "APPROVED");
    assert!(body["approved_at"].is_string());

    // A second decision hits the state-machine guard.
    let (status, _) =
        request_json(&app, "POST", &format!("/api/approval/reject/{id}"), None, Some(json!({ "reason": "too late" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // An approved event can never be re-sent.
    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/approval/send/{id}"),
        Some(&token),
        Some(json!({ "hodEmail": "hod@college.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Event is already approved");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_approval_window_refuses_decisions_until_resend(pool: sqlx::PgPool) {
    let app = build_test_app(pool.clone());
    let token = register_and_login(&app, "admin@college.edu").await;
    let id = create_event(&app, &token, "Cultural Night").await;

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/api/approval/send/{id}"),
        Some(&token),
        Some(json!({ "hodEmail": "hod@college.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Age the SENT entry past the five-hour window.
    sqlx::query(
        "UPDATE event_timeline SET created_at = NOW() - INTERVAL '6 hours' \
         WHERE event_id = $1 AND action = 'SENT'",
    )
    .bind(id)
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) =
        request_json(&app, "GET", &format!("/api/approval/event/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isExpired"], true);

    // Neither decision goes through once the window is gone.
    let (status, body) =
        request_json(&app, "POST", &format!("/api/approval/approve/{id}"), None, None).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/api/approval/reject/{id}"),
        None,
        Some(json!({ "reason": "too late" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The event itself is untouched.
    let (_, body) =
        request_json(&app, "GET", &format!("/api/events/{id}"), Some(&token), None).await;
    assert_eq!(body["approval_status"], "SENT");

    // Re-sending opens a fresh window and decisions work again.
    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/approval/send/{id}"),
        Some(&token),
        Some(json!({ "hodEmail": "hod@college.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isExpired"], false);

    let (status, body) =
        request_json(&app, "POST", &format!("/api/approval/approve/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["approval_status"], "APPROVED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rejection_requires_reason_and_allows_resend(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "admin@college.edu").await;
    let id = create_event(&app, &token, "Guest Lecture").await;

    // Deciding a DRAFT event is refused.
    let (status, _) =
        request_json(&app, "POST", &format!("/api/approval/approve/{id}"), None, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/api/approval/send/{id}"),
        Some(&token),
        Some(json!({ "hodEmail": "hod@college.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // An empty reason is a validation error, not a transition.
    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/approval/reject/{id}"),
        None,
        Some(json!({ "reason": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Reject reason required");

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/approval/reject/{id}"),
        None,
        Some(json!({ "reason": "Budget not cleared" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approval_status"], "REJECTED");
    assert_eq!(body["rejected_reason"], "Budget not cleared");

    // A rejected event can be sent again.
    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/approval/send/{id}"),
        Some(&token),
        Some(json!({ "hodEmail": "hod@college.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approval_status"], "SENT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn publishing_is_gated_on_approval_and_platform_name(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "admin@college.edu").await;
    let id = create_event(&app, &token, "Hackathon").await;

    // Unknown platform names are rejected before any lookup.
    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/social/twitter/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // A DRAFT event cannot be published or scheduled.
    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/social/instagram/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Event must be approved before publishing");

    let (status, _) = request_json(
        &app,
        "POST",
        &format!("/api/social/facebook/schedule/{id}"),
        Some(&token),
        Some(json!({ "scheduledAt": "2026-09-09T18:30:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn scheduling_an_approved_event_records_the_slot(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "admin@college.edu").await;
    let id = create_event(&app, &token, "Alumni Meet").await;

    request_json(
        &app,
        "POST",
        &format!("/api/approval/send/{id}"),
        Some(&token),
        Some(json!({ "hodEmail": "hod@college.edu" })),
    )
    .await;
    request_json(&app, "POST", &format!("/api/approval/approve/{id}"), None, None).await;

    // A missing slot is refused up front.
    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/social/instagram/schedule/{id}"),
        Some(&token),
        Some(json!({ "content": "Caption only" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Schedule date & time required");

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/social/instagram/schedule/{id}"),
        Some(&token),
        Some(json!({ "scheduledAt": "2026-09-09T18:30:00Z", "content": "See you there!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["post"]["status"], "SCHEDULED");
    assert_eq!(body["post"]["content"], "See you there!");
    assert_eq!(body["post"]["posted"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn publish_without_adapters_reports_missing_credentials(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "admin@college.edu").await;
    let id = create_event(&app, &token, "Science Day").await;

    request_json(
        &app,
        "POST",
        &format!("/api/approval/send/{id}"),
        Some(&token),
        Some(json!({ "hodEmail": "hod@college.edu" })),
    )
    .await;
    request_json(&app, "POST", &format!("/api/approval/approve/{id}"), None, None).await;

    // The test app carries no platform adapters, so the publish attempt
    // fails as a publish error after all request-side guards pass.
    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/social/instagram/{id}"),
        Some(&token),
        Some(json!({ "caption": "Launching now" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "PUBLISH_ERROR");
}

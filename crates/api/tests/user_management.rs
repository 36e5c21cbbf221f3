//! Integration tests for admin user management and profile self-service.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{build_test_app, register_and_login, request_json};

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_creates_provider_who_cannot_manage_users(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let admin_token = register_and_login(&app, "admin@college.edu").await;

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/auth/create-user",
        Some(&admin_token),
        Some(json!({ "email": "provider@college.edu", "password": "integration-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "provider@college.edu", "password": "integration-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "PROVIDER");
    let provider_token = body["token"].as_str().unwrap().to_string();

    // Admin-only surface is closed to providers.
    let (status, body) =
        request_json(&app, "GET", "/api/auth/users", Some(&provider_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin role required");

    let (status, body) =
        request_json(&app, "GET", "/api/auth/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blocking_a_user_locks_them_out_immediately(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let admin_token = register_and_login(&app, "admin@college.edu").await;
    let user_token = register_and_login(&app, "second@college.edu").await;

    let (_, users) = request_json(&app, "GET", "/api/auth/users", Some(&admin_token), None).await;
    let second_id = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == "second@college.edu")
        .and_then(|u| u["id"].as_i64())
        .unwrap();

    let (status, _) = request_json(
        &app,
        "PUT",
        &format!("/api/auth/users/{second_id}/status"),
        Some(&admin_token),
        Some(json!({ "status": "BLOCKED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The old token still validates cryptographically, but the row re-check
    // rejects the blocked account.
    let (status, body) = request_json(&app, "GET", "/api/events", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Account is blocked. Contact Admin.");

    // Unblocking restores access.
    request_json(
        &app,
        "PUT",
        &format!("/api/auth/users/{second_id}/status"),
        Some(&admin_token),
        Some(json!({ "status": "ACTIVE" })),
    )
    .await;
    let (status, _) = request_json(&app, "GET", "/api/events", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admins_cannot_block_or_delete_themselves(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let admin_token = register_and_login(&app, "admin@college.edu").await;

    let (_, me) = request_json(&app, "GET", "/api/auth/verify", Some(&admin_token), None).await;
    let my_id = me["id"].as_i64().unwrap();

    let (status, _) = request_json(
        &app,
        "PUT",
        &format!("/api/auth/users/{my_id}/status"),
        Some(&admin_token),
        Some(json!({ "status": "BLOCKED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request_json(
        &app,
        "DELETE",
        &format!("/api/auth/users/{my_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_changes_require_the_current_password(pool: sqlx::PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "admin@college.edu").await;

    let (status, body) = request_json(
        &app,
        "PUT",
        "/api/auth/profile/password",
        Some(&token),
        Some(json!({ "currentPassword": "wrong-pass", "newPassword": "another-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Incorrect current password");

    let (status, _) = request_json(
        &app,
        "PUT",
        "/api/auth/profile/password",
        Some(&token),
        Some(json!({ "currentPassword": "integration-pass", "newPassword": "another-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old password no longer logs in, the new one does.
    let (status, _) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@college.edu", "password": "integration-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@college.edu", "password": "another-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Email change: the unique constraint turns a duplicate into a 409.
    register_and_login(&app, "taken@college.edu").await;
    let (status, _) = request_json(
        &app,
        "PUT",
        "/api/auth/profile/email",
        Some(&token),
        Some(json!({ "currentPassword": "another-pass", "newEmail": "taken@college.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

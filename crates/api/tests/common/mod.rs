//! Shared helpers for API integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use evently_api::auth::jwt::JwtConfig;
use evently_api::config::ServerConfig;
use evently_api::publish::PublisherSet;
use evently_api::router::build_app_router;
use evently_api::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build the full app router against a test database, with no platform
/// adapters and no mailer configured.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".into()],
        request_timeout_secs: 5,
        shutdown_timeout_secs: 5,
        public_url: None,
        frontend_url: "http://localhost:3000".into(),
        admin_email: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".into(),
            access_token_expiry_days: 1,
            magic_link_expiry_days: 1,
        },
    };

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        publishers: Arc::new(PublisherSet::new(None, None)),
        ai: Arc::new(evently_ai::ChatClient::from_env()),
        mailer: None,
    };

    build_app_router(state, &config)
}

/// Send a JSON request and return (status, parsed body).
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    parse_response(response).await
}

async fn parse_response(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Register an account and log in, returning the access token.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    let credentials = json!({ "email": email, "password": "integration-pass" });

    let (status, _) = request_json(app, "POST", "/api/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::OK, "register should succeed");

    let (status, body) = request_json(app, "POST", "/api/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK, "login should succeed");
    body["token"].as_str().expect("login returns token").to_string()
}

/// Create an event via the API and return its id.
pub async fn create_event(app: &Router, token: &str, title: &str) -> i64 {
    let (status, body) = request_json(
        app,
        "POST",
        "/api/events",
        Some(token),
        Some(json!({
            "title": title,
            "type": "Workshop",
            "details": "Hands-on introduction to transformer models.",
            "department": "CSE",
            "date": "2026-09-10T09:00:00Z",
            "audience": "Students",
            "images": ["https://cdn.example.edu/poster.jpg"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "event create should succeed: {body}");
    body["id"].as_i64().expect("event has id")
}

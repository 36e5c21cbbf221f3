//! Route definitions for authentication, password reset, and user
//! management.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{auth, users};
use crate::state::AppState;

/// Auth routes, nested under `/auth`.
///
/// ```text
/// POST   /register                            register (public)
/// POST   /login                               login (public)
/// GET    /verify                              verify token (requires auth)
/// POST   /forgot-password                     request reset link (public, admin accounts only)
/// GET    /reset-password/validate/{token}     check reset token (public)
/// POST   /reset-password                      consume reset token (public)
///
/// GET    /users                               list users (admin only)
/// POST   /create-user                         create account (admin only)
/// PUT    /users/{id}/status                   block / unblock (admin only)
/// PUT    /users/{id}/password                 set password (admin only)
/// DELETE /users/{id}                          delete account (admin only)
///
/// PUT    /profile/email                       change own email
/// PUT    /profile/password                    change own password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify", get(auth::verify))
        .route("/forgot-password", post(auth::forgot_password))
        .route(
            "/reset-password/validate/{token}",
            get(auth::validate_reset_token),
        )
        .route("/reset-password", post(auth::reset_password))
        .route("/users", get(users::list))
        .route("/create-user", post(users::create))
        .route("/users/{id}/status", put(users::update_status))
        .route("/users/{id}/password", put(users::set_password))
        .route("/users/{id}", axum::routing::delete(users::delete))
        .route("/profile/email", put(users::update_own_email))
        .route("/profile/password", put(users::update_own_password))
}

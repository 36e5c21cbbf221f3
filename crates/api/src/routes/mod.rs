pub mod ai;
pub mod approval;
pub mod auth;
pub mod chat;
pub mod events;
pub mod health;
pub mod social;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                              register (public)
/// /auth/login                                 login (public)
/// /auth/verify                                verify token
/// /auth/forgot-password                       request reset link (public)
/// /auth/reset-password/validate/{token}       check reset token (public)
/// /auth/reset-password                        consume reset token (public)
/// /auth/users                                 list users (admin only)
/// /auth/create-user                           create account (admin only)
/// /auth/users/{id}                            delete account (admin only)
/// /auth/users/{id}/status                     block / unblock (admin only)
/// /auth/users/{id}/password                   set password (admin only)
/// /auth/profile/email                         change own email
/// /auth/profile/password                      change own password
///
/// /events                                     create, list
/// /events/{id}                                get, update, delete
/// /events/public/{id}                         public read for the approval page
///
/// /approval/send/{id}                         send for approval
/// /approval/event/{id}                        review page data (public)
/// /approval/approve/{id}                      HOD approves (public)
/// /approval/reject/{id}                       HOD rejects (public)
///
/// /social/{platform}/{id}                     publish now (admin only)
/// /social/{platform}/schedule/{id}            schedule for the sweep (admin only)
///
/// /ai/generate                                caption for an event
/// /ai/suggest-time                            best posting slot
///
/// /chat                                       help assistant
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/events", events::router())
        .nest("/approval", approval::router())
        .nest("/social", social::router())
        .nest("/ai", ai::router())
        .nest("/chat", chat::router())
}

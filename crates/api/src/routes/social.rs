//! Route definitions for social publishing and scheduling.

use axum::routing::post;
use axum::Router;

use crate::handlers::social;
use crate::state::AppState;

/// Social routes, nested under `/social`. `{platform}` is `instagram` or
/// `facebook`; both endpoints are admin-only.
///
/// ```text
/// POST   /{platform}/{id}               publish now
/// POST   /{platform}/schedule/{id}      schedule for the sweep
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{platform}/{id}", post(social::publish))
        .route("/{platform}/schedule/{id}", post(social::schedule))
}

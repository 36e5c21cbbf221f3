//! Route definitions for AI assistance.

use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// AI routes, nested under `/ai` (requires auth).
///
/// ```text
/// POST   /generate               caption for an event
/// POST   /suggest-time           best posting slot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(ai::generate))
        .route("/suggest-time", post(ai::suggest_time))
}

//! Route definition for the help assistant.

use axum::routing::post;
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Chat route, nested under `/chat` (requires auth).
///
/// ```text
/// POST   /                       one-shot assistant exchange
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat::ask))
}

//! Route definitions for event CRUD.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Event routes, nested under `/events`.
///
/// ```text
/// POST   /                  create (requires auth)
/// GET    /                  list (requires auth)
/// GET    /{id}              get (requires auth)
/// PUT    /{id}              update (requires auth)
/// DELETE /{id}              delete (requires auth)
/// GET    /public/{id}       public read for the approval page
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(events::create).get(events::list))
        .route("/public/{id}", get(events::get_public))
        .route(
            "/{id}",
            get(events::get).put(events::update).delete(events::delete),
        )
}

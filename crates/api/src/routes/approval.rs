//! Route definitions for the HOD approval workflow.
//!
//! The decision endpoints are public on purpose: the HOD reaches them from
//! an emailed link without an account. The state machine and the expiry
//! window bound what an unauthenticated caller can do.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::approval;
use crate::state::AppState;

/// Approval routes, nested under `/approval`.
///
/// ```text
/// POST   /send/{id}         send for approval (requires auth)
/// GET    /event/{id}        review page data (public)
/// POST   /approve/{id}      HOD approves (public)
/// POST   /reject/{id}       HOD rejects with reason (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send/{id}", post(approval::send))
        .route("/event/{id}", get(approval::get_event))
        .route("/approve/{id}", post(approval::approve))
        .route("/reject/{id}", post(approval::reject))
}

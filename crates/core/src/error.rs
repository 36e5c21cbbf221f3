//! Domain-level error type shared across crates.

use crate::types::DbId;

/// Domain errors produced by core logic and repositories.
///
/// The API layer maps these onto HTTP status codes; see `AppError` in
/// `evently-api`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity type name, e.g. `"Event"`.
        entity: &'static str,
        /// The id that was looked up.
        id: DbId,
    },

    /// The request was well-formed but semantically invalid.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with the entity's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication is missing or invalid.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Standard `{ "message": ... }` acknowledgement envelope for operations
/// whose result is just success/failure.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

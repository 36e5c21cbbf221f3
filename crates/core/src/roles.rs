//! User role and account status constants.
//!
//! Stored as plain text in the `users` table and embedded in JWT claims.

/// Full administrative access: event CRUD, approval dispatch, publishing.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Restricted account that can view events but not publish.
pub const ROLE_PROVIDER: &str = "PROVIDER";

/// Account may authenticate and use the API.
pub const STATUS_ACTIVE: &str = "ACTIVE";

/// Account is locked out; every authenticated request is rejected with 403.
pub const STATUS_BLOCKED: &str = "BLOCKED";

//! Approval timeline action and actor constants.
//!
//! The timeline is append-only: every state transition records exactly one
//! entry, and entries are never mutated or reordered.

/// Event sent to the HOD for approval.
pub const ACTION_SENT: &str = "SENT";

/// HOD approved the event.
pub const ACTION_APPROVED: &str = "APPROVED";

/// HOD rejected the event (entry carries the reason).
pub const ACTION_REJECTED: &str = "REJECTED";

/// The admin who manages events through the dashboard.
pub const ACTOR_ADMIN: &str = "ADMIN";

/// The department head acting through an emailed magic link.
pub const ACTOR_HOD: &str = "HOD";

/// The background publish sweep.
pub const ACTOR_SYSTEM: &str = "SYSTEM";

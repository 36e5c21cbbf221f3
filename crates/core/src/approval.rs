//! The event approval state machine.
//!
//! An event moves DRAFT -> SENT -> APPROVED/REJECTED via emailed magic
//! links; a rejected event may be re-sent. Expiry of a pending approval is a
//! derived read-time property, never stored: a SENT event is expired once
//! more than [`APPROVAL_WINDOW_HOURS`] have passed since the most recent
//! SENT timeline entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// How long an approval request stays actionable, in hours.
pub const APPROVAL_WINDOW_HOURS: i64 = 5;

/// Approval lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// The stored text form (matches the database column values).
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Draft => "DRAFT",
            ApprovalStatus::Sent => "SENT",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::Rejected => "REJECTED",
        }
    }

    /// Whether the event can be (re)sent for approval from this status.
    ///
    /// Allowed from DRAFT and REJECTED (the normal cycle) and from SENT
    /// (resend -- expiry never blocks resending). APPROVED is terminal for
    /// the approval cycle: the status never regresses.
    pub fn can_send(self) -> bool {
        self != ApprovalStatus::Approved
    }

    /// Whether an approve/reject decision is acceptable in this status.
    ///
    /// Only SENT events are awaiting a decision. A decision against any
    /// other status is a no-op error; callers must not mutate state or
    /// append timeline entries for it.
    pub fn can_decide(self) -> bool {
        self == ApprovalStatus::Sent
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(ApprovalStatus::Draft),
            "SENT" => Ok(ApprovalStatus::Sent),
            "APPROVED" => Ok(ApprovalStatus::Approved),
            "REJECTED" => Ok(ApprovalStatus::Rejected),
            other => Err(CoreError::Internal(format!(
                "Unknown approval status: {other}"
            ))),
        }
    }
}

/// Compute the derived `isExpired` flag for an event.
///
/// True iff the event is currently SENT and the most recent SENT timeline
/// entry is older than the approval window. Events in any other status are
/// never expired, and a fresh SENT entry (resend) immediately clears the
/// flag.
pub fn is_expired(status: ApprovalStatus, last_sent_at: Option<Timestamp>, now: Timestamp) -> bool {
    if status != ApprovalStatus::Sent {
        return false;
    }
    match last_sent_at {
        Some(sent_at) => now - sent_at > chrono::Duration::hours(APPROVAL_WINDOW_HOURS),
        None => false,
    }
}

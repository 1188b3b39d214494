//! Share invitation entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keyhub_core::types::ShareId;

/// Lifecycle state of an invitation.
///
/// `Pending` moves to either `Accepted` or `Rejected`; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum InvitationStatus {
    /// Awaiting a response.
    Pending,
    /// The invitee accepted.
    Accepted,
    /// The invitee declined.
    Rejected,
}

impl InvitationStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// An invitation of one email address to a private share.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    /// Surrogate identifier.
    pub id: i64,
    /// Share the invitation belongs to.
    pub share_id: ShareId,
    /// Normalized invitee email.
    pub email: String,
    /// Current status.
    pub status: InvitationStatus,
    /// When the invitation was created. Resending does not change it.
    pub invited_at: DateTime<Utc>,
    /// When the invitee accepted or rejected.
    pub responded_at: Option<DateTime<Utc>>,
}

//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keyhub_core::types::{GroupId, ShareId, UserId};

/// How a share grants access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_type", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum ShareType {
    /// Anyone holding the link may view.
    Public,
    /// Only invitees who accepted may view.
    Private,
}

impl std::fmt::Display for ShareType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "PUBLIC"),
            Self::Private => write!(f, "PRIVATE"),
        }
    }
}

impl std::str::FromStr for ShareType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Self::Public),
            "PRIVATE" => Ok(Self::Private),
            other => Err(format!("Invalid share type: {other}")),
        }
    }
}

/// A read-only share of one group. At most one exists per group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Share {
    /// Public share identifier.
    pub id: ShareId,
    /// User who created the share (the group owner).
    pub owner_id: UserId,
    /// Shared group.
    pub group_id: GroupId,
    /// Share type; fixed for the lifetime of the share.
    pub share_type: ShareType,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl Share {
    /// Whether `user_id` owns this share.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Whether the share only admits invited users.
    pub fn is_private(&self) -> bool {
        self.share_type == ShareType::Private
    }
}

/// Data required to create a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShare {
    /// Pre-generated share identifier.
    pub id: ShareId,
    /// Owning user.
    pub owner_id: UserId,
    /// Group to share.
    pub group_id: GroupId,
    /// Share type.
    pub share_type: ShareType,
}

//! Group entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keyhub_core::types::{GroupId, UserId};

/// A named collection of key/value items owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Owning user.
    pub owner_id: UserId,
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
    /// When the group was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Summary without ownership or timestamps.
    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Identifying fields of a group, as shown alongside a share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group identifier.
    pub id: GroupId,
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Data required to create a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroup {
    /// Owning user.
    pub owner_id: UserId,
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

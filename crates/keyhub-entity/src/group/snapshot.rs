//! Read-only view of a group's full contents.

use serde::{Deserialize, Serialize};

use super::item::GroupItem;
use super::model::Group;

/// Name and email of a group owner, as shown to viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
    /// Display name, if known.
    pub name: Option<String>,
    /// Email address.
    pub email: String,
}

/// A group with every item (oldest first) and the owner's contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// The group itself.
    pub group: Group,
    /// All items, ordered by creation time ascending.
    pub items: Vec<GroupItem>,
    /// Owner contact details.
    pub owner: OwnerSummary,
}

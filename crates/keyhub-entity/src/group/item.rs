//! Group items and their tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keyhub_core::types::{GroupId, ItemId, TagId};

/// A key/value entry inside a group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupItem {
    /// Unique item identifier.
    pub id: ItemId,
    /// Owning group.
    pub group_id: GroupId,
    /// Key, unique within the group.
    pub key: String,
    /// Stored value.
    pub value: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last modified.
    pub updated_at: DateTime<Utc>,
    /// Tags attached to the item; loaded separately.
    #[sqlx(skip)]
    #[serde(default)]
    pub tags: Vec<ItemTag>,
}

/// A free-form label on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ItemTag {
    /// Unique tag identifier.
    pub id: TagId,
    /// Tagged item.
    pub item_id: ItemId,
    /// Tag text.
    pub tag: String,
}

/// Data required to add an item to a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    /// Key, unique within the group.
    pub key: String,
    /// Stored value.
    pub value: String,
    /// Optional description.
    pub description: Option<String>,
    /// Tags to attach.
    #[serde(default)]
    pub tags: Vec<String>,
}

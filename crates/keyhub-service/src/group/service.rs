//! Group and item management.

use std::sync::Arc;

use tracing::info;

use keyhub_core::error::AppError;
use keyhub_core::result::AppResult;
use keyhub_core::types::{GroupId, UserId};
use keyhub_database::{GroupStore, UserStore};
use keyhub_entity::{CreateGroup, CreateItem, Group, GroupItem, GroupSnapshot, OwnerSummary};

/// Creates groups, adds items and assembles read-only snapshots.
#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupStore>,
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for GroupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupService").finish_non_exhaustive()
    }
}

impl GroupService {
    /// Creates a new group service.
    pub fn new(groups: Arc<dyn GroupStore>, users: Arc<dyn UserStore>) -> Self {
        Self { groups, users }
    }

    /// Creates a group owned by `owner_id`.
    pub async fn create_group(
        &self,
        owner_id: UserId,
        name: &str,
        description: Option<String>,
    ) -> AppResult<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Group name must not be empty"));
        }

        let group = self
            .groups
            .create(&CreateGroup {
                owner_id,
                name: name.to_string(),
                description,
            })
            .await?;

        info!(group_id = %group.id, owner_id = %owner_id, "Group created");
        Ok(group)
    }

    /// Adds an item to a group the caller owns.
    pub async fn add_item(
        &self,
        owner_id: UserId,
        group_id: GroupId,
        mut item: CreateItem,
    ) -> AppResult<GroupItem> {
        self.owned(group_id, owner_id).await?;

        item.key = item.key.trim().to_string();
        if item.key.is_empty() {
            return Err(AppError::validation("Item key must not be empty"));
        }
        item.tags = item
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        self.groups.add_item(group_id, &item).await
    }

    /// Groups owned by `owner_id`.
    pub async fn list_groups(&self, owner_id: UserId) -> AppResult<Vec<Group>> {
        self.groups.list_by_owner(owner_id).await
    }

    /// Items of a group the caller owns.
    pub async fn list_items(&self, owner_id: UserId, group_id: GroupId) -> AppResult<Vec<GroupItem>> {
        self.owned(group_id, owner_id).await?;
        self.groups.list_items(group_id).await
    }

    /// Deletes a group; its items, share and invitations go with it.
    pub async fn delete_group(&self, owner_id: UserId, group_id: GroupId) -> AppResult<()> {
        self.owned(group_id, owner_id).await?;
        self.groups.delete(group_id).await?;
        info!(group_id = %group_id, "Group deleted");
        Ok(())
    }

    /// Full contents of a group with its owner, or `None` if the group is gone.
    pub async fn snapshot(&self, group_id: GroupId) -> AppResult<Option<GroupSnapshot>> {
        let Some(group) = self.groups.find_by_id(group_id).await? else {
            return Ok(None);
        };

        let owner = self
            .users
            .find_by_id(group.owner_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Owner of group {group_id} is missing")))?;
        let items = self.groups.list_items(group_id).await?;

        Ok(Some(GroupSnapshot {
            group,
            items,
            owner: OwnerSummary {
                name: owner.name,
                email: owner.email,
            },
        }))
    }

    async fn owned(&self, group_id: GroupId, owner_id: UserId) -> AppResult<Group> {
        self.groups
            .find_owned(group_id, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("Group not found"))
    }
}

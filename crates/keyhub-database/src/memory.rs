//! In-process implementation of every store trait.
//!
//! All tables live behind one lock so that uniqueness checks and cascades
//! happen atomically with the write that depends on them. Selected with
//! `database.url = "memory://"`; data is lost on restart.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use keyhub_core::error::AppError;
use keyhub_core::result::AppResult;
use keyhub_core::types::{GroupId, ItemId, ShareId, TagId, UserId};
use keyhub_entity::{
    CreateGroup, CreateItem, CreateShare, Group, GroupItem, Invitation, InvitationStatus, ItemTag,
    Share, SyncUser, User,
};

use crate::store::{GroupStore, InvitationStore, ShareStore, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    groups: Vec<Group>,
    items: Vec<GroupItem>,
    shares: Vec<Share>,
    invitations: Vec<Invitation>,
    next_invitation_id: i64,
}

impl Tables {
    fn cascade_share(&mut self, share_id: &ShareId) {
        self.invitations.retain(|i| &i.share_id != share_id);
    }
}

/// In-memory store backing all four store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AppError::internal("memory store lock poisoned"))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AppError::internal("memory store lock poisoned"))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert(&self, user: &SyncUser) -> AppResult<User> {
        let mut tables = self.write()?;
        if tables
            .users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(AppError::conflict(
                "Email is already linked to another account",
            ));
        }

        let now = Utc::now();
        let record = tables.users.entry(user.id).or_insert_with(|| User {
            id: user.id,
            email: user.email.clone(),
            name: None,
            created_at: now,
            updated_at: now,
        });
        record.email = user.email.clone();
        if user.name.is_some() {
            record.name = user.name.clone();
        }
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.read()?.users.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn create(&self, data: &CreateGroup) -> AppResult<Group> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(&data.owner_id) {
            return Err(AppError::database(format!(
                "Group owner {} does not exist",
                data.owner_id
            )));
        }

        let now = Utc::now();
        let group = Group {
            id: GroupId::new(),
            owner_id: data.owner_id,
            name: data.name.clone(),
            description: data.description.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.groups.push(group.clone());
        Ok(group)
    }

    async fn find_by_id(&self, id: GroupId) -> AppResult<Option<Group>> {
        Ok(self.read()?.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn find_owned(&self, id: GroupId, owner_id: UserId) -> AppResult<Option<Group>> {
        Ok(self
            .read()?
            .groups
            .iter()
            .find(|g| g.id == id && g.owner_id == owner_id)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Group>> {
        Ok(self
            .read()?
            .groups
            .iter()
            .filter(|g| g.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn add_item(&self, group_id: GroupId, item: &CreateItem) -> AppResult<GroupItem> {
        let mut tables = self.write()?;
        if !tables.groups.iter().any(|g| g.id == group_id) {
            return Err(AppError::database(format!(
                "Group {group_id} does not exist"
            )));
        }
        if tables
            .items
            .iter()
            .any(|i| i.group_id == group_id && i.key == item.key)
        {
            return Err(AppError::conflict(format!(
                "Key '{}' already exists in this group",
                item.key
            )));
        }

        let now = Utc::now();
        let id = ItemId::new();
        let mut tags: Vec<ItemTag> = Vec::new();
        for tag in &item.tags {
            if !tags.iter().any(|t| &t.tag == tag) {
                tags.push(ItemTag {
                    id: TagId::new(),
                    item_id: id,
                    tag: tag.clone(),
                });
            }
        }
        tags.sort_by(|a, b| a.tag.cmp(&b.tag));

        let created = GroupItem {
            id,
            group_id,
            key: item.key.clone(),
            value: item.value.clone(),
            description: item.description.clone(),
            created_at: now,
            updated_at: now,
            tags,
        };
        tables.items.push(created.clone());
        Ok(created)
    }

    async fn list_items(&self, group_id: GroupId) -> AppResult<Vec<GroupItem>> {
        Ok(self
            .read()?
            .items
            .iter()
            .filter(|i| i.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: GroupId) -> AppResult<bool> {
        let mut tables = self.write()?;
        let before = tables.groups.len();
        tables.groups.retain(|g| g.id != id);
        if tables.groups.len() == before {
            return Ok(false);
        }

        tables.items.retain(|i| i.group_id != id);
        let removed: Vec<ShareId> = tables
            .shares
            .iter()
            .filter(|s| s.group_id == id)
            .map(|s| s.id.clone())
            .collect();
        tables.shares.retain(|s| s.group_id != id);
        for share_id in &removed {
            tables.cascade_share(share_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn find_by_id(&self, id: &ShareId) -> AppResult<Option<Share>> {
        Ok(self.read()?.shares.iter().find(|s| &s.id == id).cloned())
    }

    async fn find_by_group(&self, group_id: GroupId) -> AppResult<Option<Share>> {
        Ok(self
            .read()?
            .shares
            .iter()
            .find(|s| s.group_id == group_id)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Share>> {
        let mut shares: Vec<Share> = self
            .read()?
            .shares
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        shares.reverse();
        Ok(shares)
    }

    async fn create(&self, data: &CreateShare) -> AppResult<Share> {
        let mut tables = self.write()?;
        if !tables.groups.iter().any(|g| g.id == data.group_id) {
            return Err(AppError::database(format!(
                "Group {} does not exist",
                data.group_id
            )));
        }
        if tables
            .shares
            .iter()
            .any(|s| s.group_id == data.group_id || s.id == data.id)
        {
            return Err(AppError::conflict("This group already has an active share"));
        }

        let share = Share {
            id: data.id.clone(),
            owner_id: data.owner_id,
            group_id: data.group_id,
            share_type: data.share_type,
            created_at: Utc::now(),
        };
        tables.shares.push(share.clone());
        Ok(share)
    }

    async fn delete(&self, id: &ShareId) -> AppResult<bool> {
        let mut tables = self.write()?;
        let before = tables.shares.len();
        tables.shares.retain(|s| &s.id != id);
        if tables.shares.len() == before {
            return Ok(false);
        }
        tables.cascade_share(id);
        Ok(true)
    }
}

#[async_trait]
impl InvitationStore for MemoryStore {
    async fn find(&self, share_id: &ShareId, email: &str) -> AppResult<Option<Invitation>> {
        Ok(self
            .read()?
            .invitations
            .iter()
            .find(|i| &i.share_id == share_id && i.email == email)
            .cloned())
    }

    async fn list_by_share(&self, share_id: &ShareId) -> AppResult<Vec<Invitation>> {
        Ok(self
            .read()?
            .invitations
            .iter()
            .filter(|i| &i.share_id == share_id)
            .cloned()
            .collect())
    }

    async fn create_pending(
        &self,
        share_id: &ShareId,
        email: &str,
    ) -> AppResult<Option<Invitation>> {
        let mut tables = self.write()?;
        if !tables.shares.iter().any(|s| &s.id == share_id) {
            return Err(AppError::database(format!(
                "Share {share_id} does not exist"
            )));
        }
        if tables
            .invitations
            .iter()
            .any(|i| &i.share_id == share_id && i.email == email)
        {
            return Ok(None);
        }

        tables.next_invitation_id += 1;
        let invitation = Invitation {
            id: tables.next_invitation_id,
            share_id: share_id.clone(),
            email: email.to_string(),
            status: InvitationStatus::Pending,
            invited_at: Utc::now(),
            responded_at: None,
        };
        tables.invitations.push(invitation.clone());
        Ok(Some(invitation))
    }

    async fn transition(
        &self,
        id: i64,
        from: InvitationStatus,
        to: InvitationStatus,
        responded_at: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>> {
        let mut tables = self.write()?;
        match tables
            .invitations
            .iter_mut()
            .find(|i| i.id == id && i.status == from)
        {
            Some(invitation) => {
                invitation.status = to;
                invitation.responded_at = Some(responded_at);
                Ok(Some(invitation.clone()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use keyhub_core::error::ErrorKind;
    use keyhub_entity::ShareType;

    use super::*;

    async fn seed(store: &MemoryStore) -> (UserId, Group) {
        let owner = UserId::new();
        UserStore::upsert(
            store,
            &SyncUser {
                id: owner,
                email: "owner@example.com".to_string(),
                name: Some("Owner".to_string()),
            },
        )
        .await
        .expect("upsert");
        let group = GroupStore::create(
            store,
            &CreateGroup {
                owner_id: owner,
                name: "prod".to_string(),
                description: None,
            },
        )
        .await
        .expect("group");
        (owner, group)
    }

    fn new_share(owner: UserId, group: GroupId) -> CreateShare {
        CreateShare {
            id: ShareId::generate(),
            owner_id: owner,
            group_id: group,
            share_type: ShareType::Private,
        }
    }

    #[tokio::test]
    async fn test_one_share_per_group() {
        let store = MemoryStore::new();
        let (owner, group) = seed(&store).await;

        ShareStore::create(&store, &new_share(owner, group.id))
            .await
            .expect("first share");
        let err = ShareStore::create(&store, &new_share(owner, group.id))
            .await
            .expect_err("second share must conflict");
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_create_pending_is_insert_if_absent() {
        let store = MemoryStore::new();
        let (owner, group) = seed(&store).await;
        let share = ShareStore::create(&store, &new_share(owner, group.id))
            .await
            .expect("share");

        let first = store
            .create_pending(&share.id, "x@example.com")
            .await
            .expect("insert");
        let second = store
            .create_pending(&share.id, "x@example.com")
            .await
            .expect("insert");
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(store.list_by_share(&share.id).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_transition_requires_expected_status() {
        let store = MemoryStore::new();
        let (owner, group) = seed(&store).await;
        let share = ShareStore::create(&store, &new_share(owner, group.id))
            .await
            .expect("share");
        let invitation = store
            .create_pending(&share.id, "x@example.com")
            .await
            .expect("insert")
            .expect("created");

        let now = Utc::now();
        let accepted = store
            .transition(
                invitation.id,
                InvitationStatus::Pending,
                InvitationStatus::Accepted,
                now,
            )
            .await
            .expect("transition");
        assert_eq!(
            accepted.map(|i| i.status),
            Some(InvitationStatus::Accepted)
        );

        let rejected = store
            .transition(
                invitation.id,
                InvitationStatus::Pending,
                InvitationStatus::Rejected,
                now,
            )
            .await
            .expect("transition");
        assert!(rejected.is_none());
    }

    #[tokio::test]
    async fn test_deleting_share_cascades_invitations() {
        let store = MemoryStore::new();
        let (owner, group) = seed(&store).await;
        let share = ShareStore::create(&store, &new_share(owner, group.id))
            .await
            .expect("share");
        store
            .create_pending(&share.id, "x@example.com")
            .await
            .expect("insert");

        assert!(ShareStore::delete(&store, &share.id).await.expect("delete"));
        assert!(store.list_by_share(&share.id).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_deleting_group_cascades_share_and_items() {
        let store = MemoryStore::new();
        let (owner, group) = seed(&store).await;
        store
            .add_item(
                group.id,
                &CreateItem {
                    key: "API_KEY".to_string(),
                    value: "secret".to_string(),
                    description: None,
                    tags: vec!["prod".to_string()],
                },
            )
            .await
            .expect("item");
        let share = ShareStore::create(&store, &new_share(owner, group.id))
            .await
            .expect("share");
        store
            .create_pending(&share.id, "x@example.com")
            .await
            .expect("insert");

        assert!(GroupStore::delete(&store, group.id).await.expect("delete"));
        assert!(
            ShareStore::find_by_id(&store, &share.id)
                .await
                .expect("find")
                .is_none()
        );
        assert!(store.list_items(group.id).await.expect("items").is_empty());
        assert!(store.find(&share.id, "x@example.com").await.expect("find").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_item_key_conflicts() {
        let store = MemoryStore::new();
        let (_, group) = seed(&store).await;
        let item = CreateItem {
            key: "TOKEN".to_string(),
            value: "a".to_string(),
            description: None,
            tags: vec![],
        };
        store.add_item(group.id, &item).await.expect("first");
        let err = store
            .add_item(group.id, &item)
            .await
            .expect_err("duplicate key");
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}

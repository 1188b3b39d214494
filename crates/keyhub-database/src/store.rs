//! Store traits consumed by the service layer.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-process one in [`crate::memory`]. Uniqueness rules (one share
//! per group, one invitation per share and email) are enforced by the
//! store itself so concurrent callers cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use keyhub_core::result::AppResult;
use keyhub_core::types::{GroupId, ShareId, UserId};
use keyhub_entity::{
    CreateGroup, CreateItem, CreateShare, Group, GroupItem, Invitation, InvitationStatus, Share,
    SyncUser, User,
};

/// Users mirrored from the identity provider.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert the user or refresh email and name. Idempotent.
    ///
    /// A provided `name` overwrites the stored one; `None` keeps it.
    async fn upsert(&self, user: &SyncUser) -> AppResult<User>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// List all users ordered by email.
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Groups and their items.
#[async_trait]
pub trait GroupStore: Send + Sync + 'static {
    /// Create a group.
    async fn create(&self, data: &CreateGroup) -> AppResult<Group>;

    /// Find a group by id.
    async fn find_by_id(&self, id: GroupId) -> AppResult<Option<Group>>;

    /// Find a group only if `owner_id` owns it.
    async fn find_owned(&self, id: GroupId, owner_id: UserId) -> AppResult<Option<Group>>;

    /// List groups owned by a user, oldest first.
    async fn list_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Group>>;

    /// Add an item with tags. Fails with `CONFLICT` when the key exists.
    async fn add_item(&self, group_id: GroupId, item: &CreateItem) -> AppResult<GroupItem>;

    /// All items of a group with tags, ordered by creation time ascending.
    async fn list_items(&self, group_id: GroupId) -> AppResult<Vec<GroupItem>>;

    /// Delete a group together with its items, share and invitations.
    async fn delete(&self, id: GroupId) -> AppResult<bool>;
}

/// Shares.
#[async_trait]
pub trait ShareStore: Send + Sync + 'static {
    /// Find a share by id.
    async fn find_by_id(&self, id: &ShareId) -> AppResult<Option<Share>>;

    /// Find the share of a group, if any.
    async fn find_by_group(&self, group_id: GroupId) -> AppResult<Option<Share>>;

    /// List shares created by a user, newest first.
    async fn list_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Share>>;

    /// Insert a share. Fails with `CONFLICT` when the group already has one.
    async fn create(&self, data: &CreateShare) -> AppResult<Share>;

    /// Delete a share and its invitations. Returns `true` if it existed.
    async fn delete(&self, id: &ShareId) -> AppResult<bool>;
}

/// Share invitations.
#[async_trait]
pub trait InvitationStore: Send + Sync + 'static {
    /// Find the invitation of `email` (normalized) to a share.
    async fn find(&self, share_id: &ShareId, email: &str) -> AppResult<Option<Invitation>>;

    /// All invitations of a share, oldest first.
    async fn list_by_share(&self, share_id: &ShareId) -> AppResult<Vec<Invitation>>;

    /// Insert a `PENDING` invitation unless one exists for the pair.
    ///
    /// Returns `None` when the invitation already existed.
    async fn create_pending(&self, share_id: &ShareId, email: &str)
    -> AppResult<Option<Invitation>>;

    /// Move an invitation from `from` to `to`, stamping `responded_at`.
    ///
    /// Returns `None` without changes when the current status is not `from`.
    async fn transition(
        &self,
        id: i64,
        from: InvitationStatus,
        to: InvitationStatus,
        responded_at: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>>;
}

//! Group and item repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use keyhub_core::error::{AppError, ErrorKind};
use keyhub_core::result::AppResult;
use keyhub_core::types::{GroupId, ItemId, TagId, UserId};
use keyhub_entity::{CreateGroup, CreateItem, Group, GroupItem, ItemTag};

use crate::connection::map_write_error;
use crate::store::GroupStore;

/// Repository for groups, their items and item tags.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Create a new group repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupStore for GroupRepository {
    async fn create(&self, data: &CreateGroup) -> AppResult<Group> {
        sqlx::query_as::<_, Group>(
            "INSERT INTO groups (id, owner_id, name, description) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(GroupId::new())
        .bind(data.owner_id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create group", e))
    }

    async fn find_by_id(&self, id: GroupId) -> AppResult<Option<Group>> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find group", e))
    }

    async fn find_owned(&self, id: GroupId, owner_id: UserId) -> AppResult<Option<Group>> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find group", e))
    }

    async fn list_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Group>> {
        sqlx::query_as::<_, Group>(
            "SELECT * FROM groups WHERE owner_id = $1 ORDER BY created_at, id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list groups", e))
    }

    async fn add_item(&self, group_id: GroupId, item: &CreateItem) -> AppResult<GroupItem> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut created = sqlx::query_as::<_, GroupItem>(
            "INSERT INTO group_items (id, group_id, key, value, description) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(ItemId::new())
        .bind(group_id)
        .bind(&item.key)
        .bind(&item.value)
        .bind(&item.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "Failed to add item",
                format!("Key '{}' already exists in this group", item.key).as_str(),
            )
        })?;

        for tag in &item.tags {
            let row = sqlx::query_as::<_, ItemTag>(
                "INSERT INTO item_tags (id, item_id, tag) VALUES ($1, $2, $3) \
                 ON CONFLICT (item_id, tag) DO NOTHING RETURNING *",
            )
            .bind(TagId::new())
            .bind(created.id)
            .bind(tag)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to tag item", e))?;
            created.tags.extend(row);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(created)
    }

    async fn list_items(&self, group_id: GroupId) -> AppResult<Vec<GroupItem>> {
        let mut items = sqlx::query_as::<_, GroupItem>(
            "SELECT * FROM group_items WHERE group_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list items", e))?;

        if items.is_empty() {
            return Ok(items);
        }

        let ids: Vec<Uuid> = items.iter().map(|item| item.id.into_uuid()).collect();
        let tags = sqlx::query_as::<_, ItemTag>(
            "SELECT * FROM item_tags WHERE item_id = ANY($1) ORDER BY tag",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tags", e))?;

        let mut by_item: HashMap<ItemId, Vec<ItemTag>> = HashMap::new();
        for tag in tags {
            by_item.entry(tag.item_id).or_default().push(tag);
        }
        for item in &mut items {
            item.tags = by_item.remove(&item.id).unwrap_or_default();
        }

        Ok(items)
    }

    async fn delete(&self, id: GroupId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete group", e))?;

        Ok(result.rows_affected() > 0)
    }
}

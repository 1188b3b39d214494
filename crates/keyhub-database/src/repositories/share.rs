//! Share repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use keyhub_core::error::{AppError, ErrorKind};
use keyhub_core::result::AppResult;
use keyhub_core::types::{GroupId, ShareId, UserId};
use keyhub_entity::{CreateShare, Share};

use crate::connection::map_write_error;
use crate::store::ShareStore;

/// Repository for shares.
///
/// `shares.group_id` carries a UNIQUE constraint, so [`ShareStore::create`]
/// is the single point that enforces one share per group.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn find_by_id(&self, id: &ShareId) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    async fn find_by_group(&self, group_id: GroupId) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE group_id = $1")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share by group", e)
            })
    }

    async fn list_by_owner(&self, owner_id: UserId) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM shares WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))
    }

    async fn create(&self, data: &CreateShare) -> AppResult<Share> {
        sqlx::query_as::<_, Share>(
            "INSERT INTO shares (id, owner_id, group_id, share_type) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.id)
        .bind(data.owner_id)
        .bind(data.group_id)
        .bind(data.share_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "Failed to create share",
                "This group already has an active share",
            )
        })
    }

    async fn delete(&self, id: &ShareId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shares WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete share", e))?;

        Ok(result.rows_affected() > 0)
    }
}

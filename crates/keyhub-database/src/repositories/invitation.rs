//! Share invitation repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use keyhub_core::error::{AppError, ErrorKind};
use keyhub_core::result::AppResult;
use keyhub_core::types::ShareId;
use keyhub_entity::{Invitation, InvitationStatus};

use crate::store::InvitationStore;

/// Repository for share invitations.
#[derive(Debug, Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Create a new invitation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationStore for InvitationRepository {
    async fn find(&self, share_id: &ShareId, email: &str) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "SELECT * FROM share_invitations WHERE share_id = $1 AND email = $2",
        )
        .bind(share_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find invitation", e))
    }

    async fn list_by_share(&self, share_id: &ShareId) -> AppResult<Vec<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "SELECT * FROM share_invitations WHERE share_id = $1 ORDER BY invited_at, id",
        )
        .bind(share_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list invitations", e))
    }

    async fn create_pending(
        &self,
        share_id: &ShareId,
        email: &str,
    ) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "INSERT INTO share_invitations (share_id, email, status) VALUES ($1, $2, $3) \
             ON CONFLICT (share_id, email) DO NOTHING RETURNING *",
        )
        .bind(share_id)
        .bind(email)
        .bind(InvitationStatus::Pending)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create invitation", e))
    }

    async fn transition(
        &self,
        id: i64,
        from: InvitationStatus,
        to: InvitationStatus,
        responded_at: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "UPDATE share_invitations SET status = $3, responded_at = $4 \
             WHERE id = $1 AND status = $2 RETURNING *",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(responded_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update invitation", e))
    }
}

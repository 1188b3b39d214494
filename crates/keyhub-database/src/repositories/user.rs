//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use keyhub_core::error::{AppError, ErrorKind};
use keyhub_core::result::AppResult;
use keyhub_core::types::UserId;
use keyhub_entity::{SyncUser, User};

use crate::connection::map_write_error;
use crate::store::UserStore;

/// Repository for users mirrored from the identity provider.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn upsert(&self, user: &SyncUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, name) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, \
             name = COALESCE(EXCLUDED.name, users.name), updated_at = NOW() \
             RETURNING *",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "Failed to sync user",
                "Email is already linked to another account",
            )
        })
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY email")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }
}

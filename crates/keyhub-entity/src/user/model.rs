//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use keyhub_core::types::UserId;

/// Local mirror of an identity-provider account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identity provider subject.
    pub id: UserId,
    /// Normalized email address.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// When the record was first synced.
    pub created_at: DateTime<Utc>,
    /// When the record was last synced.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name to show to other users, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Data required to create or refresh a user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncUser {
    /// Identity provider subject.
    pub id: UserId,
    /// Normalized email address.
    pub email: String,
    /// Display name, if the provider supplies one.
    pub name: Option<String>,
}

//! User synchronization service.

use std::sync::Arc;

use tracing::info;

use keyhub_core::result::AppResult;
use keyhub_database::UserStore;
use keyhub_entity::{SyncUser, User};

use crate::context::Identity;

/// Keeps the local user table in step with the identity provider.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Idempotently upserts the caller's user record.
    pub async fn ensure_user(&self, identity: &Identity) -> AppResult<User> {
        let user = self
            .users
            .upsert(&SyncUser {
                id: identity.user_id,
                email: identity.email.clone(),
                name: identity.name.clone(),
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "User synchronized");
        Ok(user)
    }

    /// All known users, ordered by email.
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }
}

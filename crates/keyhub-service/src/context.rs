//! The caller identity passed into service operations.

use serde::{Deserialize, Serialize};

use keyhub_core::types::{UserId, normalize_email};

/// An authenticated caller, as established by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user id (the session's `sub`).
    pub user_id: UserId,
    /// Normalized email address.
    pub email: String,
    /// Display name, when the provider supplies one.
    pub name: Option<String>,
}

impl Identity {
    /// Creates an identity, normalizing the email.
    pub fn new(user_id: UserId, email: &str, name: Option<String>) -> Self {
        Self {
            user_id,
            email: normalize_email(email),
            name: name.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Name shown to other users: the display name, else the email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

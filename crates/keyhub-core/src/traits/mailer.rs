//! Outbound mail collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Content of a share invitation email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationEmail {
    /// Display name of the share owner.
    pub inviter_name: String,
    /// Email address of the share owner.
    pub inviter_email: String,
    /// Name of the shared group.
    pub group_name: String,
    /// Link that accepts the invitation.
    pub accept_url: String,
    /// Link that rejects the invitation.
    pub reject_url: String,
}

/// Delivers invitation emails.
///
/// Implementations live in `keyhub-mail`. Callers decide whether a delivery
/// failure is fatal; the trait only reports it.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider name (e.g., "resend", "log").
    fn provider_type(&self) -> &str;

    /// Send one invitation email to `to`.
    async fn send_invitation(&self, to: &str, email: &InvitationEmail) -> AppResult<()>;
}

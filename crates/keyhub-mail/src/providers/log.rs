//! Mailer that only writes to the application log.

use async_trait::async_trait;
use tracing::info;

use keyhub_core::result::AppResult;
use keyhub_core::traits::{InvitationEmail, Mailer};

use crate::template;

/// Logs invitation emails instead of delivering them.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    /// Create a log mailer with the given `From` header.
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    fn provider_type(&self) -> &str {
        "log"
    }

    async fn send_invitation(&self, to: &str, email: &InvitationEmail) -> AppResult<()> {
        info!(
            from = %self.from,
            to = %to,
            subject = %template::subject(email),
            accept_url = %email.accept_url,
            reject_url = %email.reject_url,
            "Invitation email (not delivered)"
        );
        Ok(())
    }
}

//! In-process outbox mailer.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use keyhub_core::error::AppError;
use keyhub_core::result::AppResult;
use keyhub_core::traits::{InvitationEmail, Mailer};

/// One recorded delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentInvitation {
    /// Recipient address.
    pub to: String,
    /// Message content.
    pub email: InvitationEmail,
}

/// Records invitations in memory. Can be switched to fail every delivery.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<SentInvitation>>,
    failing: AtomicBool,
}

impl MemoryMailer {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent deliveries fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of all recorded deliveries, oldest first.
    pub fn sent(&self) -> Vec<SentInvitation> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    /// Recorded deliveries addressed to `to`.
    pub fn sent_to(&self, to: &str) -> Vec<SentInvitation> {
        self.sent().into_iter().filter(|m| m.to == to).collect()
    }

    /// Wait until at least `count` deliveries are recorded or `timeout` elapses.
    ///
    /// Returns whether the count was reached. Deliveries started with
    /// `tokio::spawn` land asynchronously, so tests poll through this.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.sent().len() >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn send_invitation(&self, to: &str, email: &InvitationEmail) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service(format!(
                "Mail delivery to {to} failed"
            )));
        }

        let mut outbox = self
            .outbox
            .lock()
            .map_err(|_| AppError::internal("Mail outbox lock poisoned"))?;
        outbox.push(SentInvitation {
            to: to.to_string(),
            email: email.clone(),
        });
        Ok(())
    }
}

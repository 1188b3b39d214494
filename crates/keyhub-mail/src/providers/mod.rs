//! Mailer implementations and provider selection.

pub mod log;
pub mod memory;
pub mod resend;

use std::sync::Arc;

use tracing::info;

use keyhub_core::config::{MailConfig, MailProvider};
use keyhub_core::error::AppError;
use keyhub_core::result::AppResult;
use keyhub_core::traits::Mailer;

pub use log::LogMailer;
pub use memory::{MemoryMailer, SentInvitation};
pub use resend::ResendMailer;

/// Build the mailer selected by `config.provider`.
pub fn build_mailer(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match config.provider {
        MailProvider::Resend => {
            if config.api_key.trim().is_empty() {
                return Err(AppError::configuration(
                    "mail.api_key is required for the resend provider",
                ));
            }
            Arc::new(ResendMailer::new(config)?)
        }
        MailProvider::Log => Arc::new(LogMailer::new(config.from_header())),
        MailProvider::Memory => Arc::new(MemoryMailer::new()),
    };

    info!(provider = mailer.provider_type(), "Mail provider initialized");
    Ok(mailer)
}

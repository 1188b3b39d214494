//! Resend HTTP API mailer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use keyhub_core::config::MailConfig;
use keyhub_core::error::{AppError, ErrorKind};
use keyhub_core::result::AppResult;
use keyhub_core::traits::{InvitationEmail, Mailer};

use crate::template;

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

/// Delivers mail through `POST {api_base_url}/emails`.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl ResendMailer {
    /// Create a Resend mailer from configuration.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", config.api_base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            from: config.from_header(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    fn provider_type(&self) -> &str {
        "resend"
    }

    async fn send_invitation(&self, to: &str, email: &InvitationEmail) -> AppResult<()> {
        let body = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject: template::subject(email),
            html: template::render_html(email),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Mail provider unreachable", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(status = %status, to = %to, detail = %detail, "Mail provider rejected message");
            return Err(AppError::external_service(format!(
                "Mail provider returned {status}"
            )));
        }

        debug!(to = %to, "Invitation email accepted by provider");
        Ok(())
    }
}

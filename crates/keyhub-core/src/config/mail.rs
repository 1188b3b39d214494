//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// Which mail provider delivers invitation emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Resend HTTP API.
    Resend,
    /// Write messages to the application log only.
    Log,
    /// Keep messages in an in-process outbox.
    Memory,
}

/// Mail delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Provider selection.
    #[serde(default = "default_provider")]
    pub provider: MailProvider,
    /// API key for the HTTP provider.
    #[serde(default)]
    pub api_key: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Base URL of the provider API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl MailConfig {
    /// Formatted `From` header value.
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            api_base_url: default_api_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> MailProvider {
    MailProvider::Log
}

fn default_from_email() -> String {
    "noreply@example.com".to_string()
}

fn default_from_name() -> String {
    "Key Management".to_string()
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

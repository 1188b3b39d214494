//! Identity and invitation token configuration.

use serde::{Deserialize, Serialize};

/// Session and invitation token configuration.
///
/// Session tokens are minted by the external identity provider; KeyHub
/// only verifies them with the shared `jwt_secret`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC-SHA256 secret for session tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Allowed clock skew when validating session expiry, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Lifetime of development session tokens minted by the CLI, in minutes.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
    /// Invitation token settings.
    #[serde(default)]
    pub invitation_token: InvitationTokenConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            leeway_seconds: default_leeway(),
            session_ttl_minutes: default_session_ttl(),
            invitation_token: InvitationTokenConfig::default(),
        }
    }
}

/// Wire format of invitation tokens embedded in email links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenFormat {
    /// Unsigned base64url JSON, readable by links issued before signing.
    Plain,
    /// HS256-signed JWT carrying the same fields.
    Signed,
}

/// Invitation token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationTokenConfig {
    /// Token format.
    #[serde(default = "default_format")]
    pub format: TokenFormat,
    /// Signing secret; falls back to `auth.jwt_secret` when empty.
    #[serde(default)]
    pub secret: String,
    /// Token lifetime in hours. `0` disables expiry.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for InvitationTokenConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            secret: String::new(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_session_ttl() -> u64 {
    60
}

fn default_format() -> TokenFormat {
    TokenFormat::Signed
}

fn default_ttl_hours() -> u64 {
    24 * 14
}

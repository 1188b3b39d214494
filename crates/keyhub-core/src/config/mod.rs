//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod mail;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, InvitationTokenConfig, TokenFormat};
pub use self::database::DatabaseConfig;
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::mail::{MailConfig, MailProvider};

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "KEYHUB";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Identity and invitation token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config/default` and `config/{env}`.
    ///
    /// Environment variables prefixed with `KEYHUB__` override file values,
    /// e.g. `KEYHUB__DATABASE__URL`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration using an explicit base file (without extension).
    ///
    /// The environment overlay is looked up next to the base file.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let overlay = match base.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/{env}"),
            None => env.to_string(),
        };

        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&overlay).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_select_memory_backend_and_signed_tokens() {
        let config = AppConfig::default();
        assert_eq!(config.database.url, "memory://");
        assert_eq!(config.auth.invitation_token.format, TokenFormat::Signed);
        assert_eq!(config.mail.provider, MailProvider::Log);
        assert_eq!(config.server.public_base_url, "http://localhost:3100");
    }

    #[test]
    fn test_load_without_files_falls_back_to_defaults() {
        let config = AppConfig::load_from("does-not-exist/default", "nowhere")
            .expect("defaults should deserialize");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
    }
}

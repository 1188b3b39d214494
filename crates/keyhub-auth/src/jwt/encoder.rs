//! Session token creation.
//!
//! Production sessions come from the identity provider; this encoder mints
//! compatible tokens for the CLI and tests.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use keyhub_core::config::AuthConfig;
use keyhub_core::error::AppError;

use super::claims::SessionClaims;

/// Creates signed session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_minutes: config.session_ttl_minutes as i64,
        }
    }

    /// Mints a session token for the given account.
    pub fn issue_session(
        &self,
        user_id: Uuid,
        email: &str,
        name: Option<&str>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.ttl_minutes);

        let claims = SessionClaims {
            sub: user_id,
            email: email.to_string(),
            name: name.map(str::to_string),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok((token, exp))
    }
}

#[cfg(test)]
mod tests {
    use keyhub_core::error::ErrorKind;

    use super::*;
    use crate::jwt::decoder::JwtDecoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_session_roundtrip() {
        let cfg = config("test-secret");
        let user_id = Uuid::new_v4();
        let (token, _) = JwtEncoder::new(&cfg)
            .issue_session(user_id, "alice@example.com", Some("Alice"))
            .expect("encode");

        let claims = JwtDecoder::new(&cfg)
            .decode_session(&token)
            .expect("decode");
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let (token, _) = JwtEncoder::new(&config("one"))
            .issue_session(Uuid::new_v4(), "a@b.io", None)
            .expect("encode");

        let err = JwtDecoder::new(&config("two"))
            .decode_session(&token)
            .expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_expired_session_is_unauthorized() {
        let cfg = AuthConfig {
            session_ttl_minutes: 0,
            leeway_seconds: 0,
            ..config("test-secret")
        };
        let mut encoder = JwtEncoder::new(&cfg);
        encoder.ttl_minutes = -5;
        let (token, _) = encoder
            .issue_session(Uuid::new_v4(), "a@b.io", None)
            .expect("encode");

        let err = JwtDecoder::new(&cfg)
            .decode_session(&token)
            .expect_err("expired");
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "Session has expired");
    }

    #[test]
    fn test_garbage_is_unauthorized() {
        let err = JwtDecoder::new(&config("s"))
            .decode_session("not-a-jwt")
            .expect_err("garbage");
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}

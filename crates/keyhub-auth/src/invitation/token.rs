//! Encoding and decoding of invitation tokens.
//!
//! A token carries `{email, shareId, ts}` where `ts` is the issue time in
//! milliseconds. Two wire formats exist:
//!
//! - `plain`: base64url (no padding) of the JSON object. Anyone can forge
//!   one, so it only binds an email to a link.
//! - `signed`: an HS256 JWT over the same fields plus an optional `exp`.
//!
//! [`InvitationTokenCodec::parse`] never fails loudly: anything malformed,
//! truncated, forged, expired, or missing a field yields `None`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use keyhub_core::config::{AuthConfig, TokenFormat};
use keyhub_core::error::AppError;
use keyhub_core::types::ShareId;

/// Decoded contents of a valid invitation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationClaims {
    /// Invitee email as issued.
    pub email: String,
    /// Share the invitation belongs to.
    pub share_id: ShareId,
    /// Issue time, milliseconds since epoch.
    pub issued_at_millis: i64,
}

/// Wire representation shared by both formats.
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "shareId", default)]
    share_id: Option<String>,
    #[serde(default)]
    ts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

impl TokenPayload {
    /// Only a JSON object is a payload; serde would otherwise also read the
    /// fields positionally out of an array.
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    fn into_claims(self) -> Option<InvitationClaims> {
        let email = self.email.filter(|e| !e.is_empty())?;
        let share_id = self.share_id.filter(|s| !s.is_empty())?;
        let ts = self.ts.filter(|ts| *ts != 0)?;
        Some(InvitationClaims {
            email,
            share_id: ShareId::from_string(share_id),
            issued_at_millis: ts,
        })
    }
}

enum Mode {
    Plain,
    Signed {
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        validation: Validation,
        ttl_hours: u64,
    },
}

/// Issues and parses invitation tokens.
pub struct InvitationTokenCodec {
    mode: Mode,
}

impl std::fmt::Debug for InvitationTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationTokenCodec")
            .field("format", &self.format())
            .finish()
    }
}

impl InvitationTokenCodec {
    /// Build the codec selected by `auth.invitation_token`.
    ///
    /// The signing secret falls back to `auth.jwt_secret` when unset.
    pub fn from_config(config: &AuthConfig) -> Self {
        let settings = &config.invitation_token;
        match settings.format {
            TokenFormat::Plain => Self::plain(),
            TokenFormat::Signed => {
                let secret = if settings.secret.is_empty() {
                    config.jwt_secret.as_str()
                } else {
                    settings.secret.as_str()
                };
                Self::signed(secret.as_bytes(), settings.ttl_hours)
            }
        }
    }

    /// Unsigned base64url JSON tokens.
    pub fn plain() -> Self {
        Self { mode: Mode::Plain }
    }

    /// HS256-signed tokens; `ttl_hours == 0` means they never expire.
    pub fn signed(secret: &[u8], ttl_hours: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if ttl_hours == 0 {
            validation.validate_exp = false;
            validation.required_spec_claims.clear();
        }

        Self {
            mode: Mode::Signed {
                encoding_key: EncodingKey::from_secret(secret),
                decoding_key: DecodingKey::from_secret(secret),
                validation,
                ttl_hours,
            },
        }
    }

    /// The wire format this codec produces.
    pub fn format(&self) -> TokenFormat {
        match self.mode {
            Mode::Plain => TokenFormat::Plain,
            Mode::Signed { .. } => TokenFormat::Signed,
        }
    }

    /// Issue a token binding `email` to `share_id`, stamped with the current time.
    pub fn issue(&self, email: &str, share_id: &ShareId) -> Result<String, AppError> {
        let now = Utc::now();
        let mut payload = TokenPayload {
            email: Some(email.to_string()),
            share_id: Some(share_id.as_str().to_string()),
            ts: Some(now.timestamp_millis()),
            exp: None,
        };

        match &self.mode {
            Mode::Plain => {
                let json = serde_json::to_vec(&payload)?;
                Ok(URL_SAFE_NO_PAD.encode(json))
            }
            Mode::Signed {
                encoding_key,
                ttl_hours,
                ..
            } => {
                if *ttl_hours > 0 {
                    let exp = now + chrono::Duration::hours(*ttl_hours as i64);
                    payload.exp = Some(exp.timestamp());
                }
                encode(&Header::new(Algorithm::HS256), &payload, encoding_key).map_err(|e| {
                    AppError::internal(format!("Failed to sign invitation token: {e}"))
                })
            }
        }
    }

    /// Parse a token. Returns `None` for any invalid input.
    pub fn parse(&self, token: &str) -> Option<InvitationClaims> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let payload = match &self.mode {
            Mode::Plain => {
                let bytes = URL_SAFE_NO_PAD.decode(token.trim_end_matches('=')).ok()?;
                TokenPayload::from_value(serde_json::from_slice(&bytes).ok()?)?
            }
            Mode::Signed {
                decoding_key,
                validation,
                ..
            } => match decode::<Value>(token, decoding_key, validation) {
                Ok(data) => TokenPayload::from_value(data.claims)?,
                Err(e) => {
                    debug!(error = %e, "Rejected invitation token");
                    return None;
                }
            },
        };

        payload.into_claims()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share() -> ShareId {
        ShareId::from("V1StGXR8_Z5jdHi6B-myT")
    }

    #[test]
    fn test_plain_roundtrip() {
        let codec = InvitationTokenCodec::plain();
        let token = codec.issue("bob@example.com", &share()).expect("issue");
        let claims = codec.parse(&token).expect("parse");
        assert_eq!(claims.email, "bob@example.com");
        assert_eq!(claims.share_id, share());
        assert!(claims.issued_at_millis > 0);
    }

    #[test]
    fn test_plain_reads_externally_issued_tokens() {
        // {"email":"a@b.co","shareId":"abc","ts":1700000000000}
        let raw = r#"{"email":"a@b.co","shareId":"abc","ts":1700000000000}"#;
        let token = URL_SAFE_NO_PAD.encode(raw);
        let claims = InvitationTokenCodec::plain().parse(&token).expect("parse");
        assert_eq!(claims.email, "a@b.co");
        assert_eq!(claims.share_id.as_str(), "abc");
        assert_eq!(claims.issued_at_millis, 1_700_000_000_000);

        let padded = format!("{}==", URL_SAFE_NO_PAD.encode(r#"{"email":"a@b.co","shareId":"abc","ts":1}"#));
        assert!(InvitationTokenCodec::plain().parse(&padded).is_some());
    }

    #[test]
    fn test_plain_rejects_missing_or_empty_fields() {
        let codec = InvitationTokenCodec::plain();
        for raw in [
            r#"{"shareId":"abc","ts":1}"#,
            r#"{"email":"a@b.co","ts":1}"#,
            r#"{"email":"a@b.co","shareId":"abc"}"#,
            r#"{"email":"","shareId":"abc","ts":1}"#,
            r#"{"email":"a@b.co","shareId":"abc","ts":0}"#,
            r#"["a@b.co","abc",1]"#,
            r#"null"#,
        ] {
            let token = URL_SAFE_NO_PAD.encode(raw);
            assert!(codec.parse(&token).is_none(), "accepted {raw}");
        }
    }

    #[test]
    fn test_garbage_and_truncation_yield_none() {
        let plain = InvitationTokenCodec::plain();
        let signed = InvitationTokenCodec::signed(b"secret", 24);

        for codec in [&plain, &signed] {
            let token = codec.issue("bob@example.com", &share()).expect("issue");
            for cut in [1, token.len() / 2, token.len() - 1] {
                assert!(codec.parse(&token[..cut]).is_none());
            }
            assert!(codec.parse("").is_none());
            assert!(codec.parse("%%%not base64%%%").is_none());
            assert!(codec.parse("a.b.c").is_none());
        }
    }

    /// Every single-character replacement and deletion of `token`.
    fn mutations(token: &str) -> Vec<String> {
        let mut out = Vec::with_capacity(token.len() * 2);
        for (i, c) in token.char_indices() {
            let swap = if c == 'A' { 'B' } else { 'A' };
            let end = i + c.len_utf8();
            out.push(format!("{}{swap}{}", &token[..i], &token[end..]));
            out.push(format!("{}{}", &token[..i], &token[end..]));
        }
        out
    }

    #[test]
    fn test_mutated_tokens_never_panic() {
        let codec = InvitationTokenCodec::plain();
        let token = codec.issue("bob@example.com", &share()).expect("issue");
        for mutated in mutations(&token) {
            if let Some(claims) = codec.parse(&mutated) {
                assert!(!claims.email.is_empty());
                assert!(!claims.share_id.as_str().is_empty());
                assert_ne!(claims.issued_at_millis, 0);
            }
        }
    }

    #[test]
    fn test_mutated_signed_tokens_are_rejected() {
        let codec = InvitationTokenCodec::signed(b"secret", 24);
        let token = codec.issue("bob@example.com", &share()).expect("issue");
        for mutated in mutations(&token) {
            assert!(codec.parse(&mutated).is_none(), "accepted {mutated}");
        }
    }

    #[test]
    fn test_signed_roundtrip() {
        let codec = InvitationTokenCodec::signed(b"secret", 24);
        let token = codec.issue("bob@example.com", &share()).expect("issue");
        let claims = codec.parse(&token).expect("parse");
        assert_eq!(claims.email, "bob@example.com");
        assert_eq!(claims.share_id, share());
    }

    #[test]
    fn test_signed_without_expiry_roundtrip() {
        let codec = InvitationTokenCodec::signed(b"secret", 0);
        let token = codec.issue("bob@example.com", &share()).expect("issue");
        assert!(codec.parse(&token).is_some());
    }

    #[test]
    fn test_signed_rejects_tampering_and_foreign_keys() {
        let codec = InvitationTokenCodec::signed(b"secret", 24);
        let token = codec.issue("bob@example.com", &share()).expect("issue");

        let forged = InvitationTokenCodec::signed(b"other", 24)
            .issue("bob@example.com", &share())
            .expect("issue");
        assert!(codec.parse(&forged).is_none());

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let body = r#"{"email":"mallory@example.com","shareId":"V1StGXR8_Z5jdHi6B-myT","ts":1}"#;
        parts[1] = URL_SAFE_NO_PAD.encode(body);
        assert!(codec.parse(&parts.join(".")).is_none());

        let plain = InvitationTokenCodec::plain()
            .issue("bob@example.com", &share())
            .expect("issue");
        assert!(codec.parse(&plain).is_none());
    }

    #[test]
    fn test_from_config_defaults_to_signed() {
        let codec = InvitationTokenCodec::from_config(&AuthConfig::default());
        assert_eq!(codec.format(), TokenFormat::Signed);
    }
}

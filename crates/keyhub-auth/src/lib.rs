//! # keyhub-auth
//!
//! Identity plumbing for KeyHub:
//!
//! - [`jwt`]: verification (and, for development, minting) of session
//!   tokens issued by the external identity provider.
//! - [`invitation`]: the codec for identity-binding tokens embedded in
//!   invitation email links.

pub mod invitation;
pub mod jwt;

pub use invitation::{InvitationClaims, InvitationTokenCodec};
pub use jwt::{JwtDecoder, JwtEncoder, SessionClaims};

//! Invitation tokens: identity binding for anonymous invitation responses.

pub mod token;

pub use token::{InvitationClaims, InvitationTokenCodec};

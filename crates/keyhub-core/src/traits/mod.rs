//! Collaborator traits defined in `keyhub-core` and implemented by other crates.

pub mod mailer;

pub use mailer::{InvitationEmail, Mailer};

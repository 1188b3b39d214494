//! # keyhub-mail
//!
//! Invitation email rendering and the [`Mailer`](keyhub_core::traits::Mailer)
//! implementations: the Resend HTTP API, a log-only provider for local
//! development, and an in-process outbox used by tests.

pub mod providers;
pub mod template;

pub use providers::{LogMailer, MemoryMailer, ResendMailer, SentInvitation, build_mailer};

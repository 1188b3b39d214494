//! Session token commands for local testing without an identity provider.

use clap::{Args, Subcommand};
use uuid::Uuid;

use keyhub_auth::JwtEncoder;
use keyhub_core::config::AppConfig;
use keyhub_core::error::AppError;

use crate::output;

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Mint a session token signed with `auth.jwt_secret`
    Issue {
        /// User ID (`sub` claim)
        #[arg(long)]
        user_id: Uuid,
        /// Email claim
        #[arg(long)]
        email: String,
        /// Name claim
        #[arg(long)]
        name: Option<String>,
    },
}

/// Execute session commands
pub fn execute(args: &SessionArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        SessionCommand::Issue {
            user_id,
            email,
            name,
        } => {
            let encoder = JwtEncoder::new(&config.auth);
            let (token, expires_at) = encoder.issue_session(*user_id, email, name.as_deref())?;
            println!("{token}");
            output::print_kv("expires", &expires_at.to_rfc3339());
        }
    }
    Ok(())
}

//! Invitation token commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use keyhub_auth::InvitationTokenCodec;
use keyhub_core::config::AppConfig;
use keyhub_core::error::AppError;
use keyhub_core::types::ShareId;

use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue an invitation token in the configured format
    Issue {
        /// Invitee email
        #[arg(long)]
        email: String,
        /// Share ID
        #[arg(long)]
        share: String,
    },
    /// Decode and verify an invitation token
    Decode {
        /// The token
        token: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct ClaimsRow {
    email: String,
    share_id: String,
    issued_at: String,
}

/// Execute token commands
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let codec = InvitationTokenCodec::from_config(&config.auth);

    match &args.command {
        TokenCommand::Issue { email, share } => {
            let token = codec.issue(email, &ShareId::from_string(share.clone()))?;
            println!("{token}");
        }
        TokenCommand::Decode { token } => {
            let claims = codec
                .parse(token)
                .ok_or_else(|| AppError::validation("Token is malformed, forged or expired"))?;
            let issued_at = chrono::DateTime::from_timestamp_millis(claims.issued_at_millis)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| claims.issued_at_millis.to_string());
            output::print_item(
                &ClaimsRow {
                    email: claims.email,
                    share_id: claims.share_id.to_string(),
                    issued_at,
                },
                format,
            );
        }
    }
    Ok(())
}

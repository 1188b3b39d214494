//! Share CLI commands.

use clap::{Args, Subcommand};
use dialoguer::Confirm;
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use keyhub_core::config::AppConfig;
use keyhub_core::error::AppError;
use keyhub_core::types::{ShareId, UserId};
use keyhub_entity::InvitationStatus;
use keyhub_service::ShareDetails;

use crate::output::{self, OutputFormat};

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: ShareCommand,
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// List the shares of an owner
    List {
        /// Owner user ID
        #[arg(long)]
        owner: Uuid,
    },
    /// Revoke a share and its invitations
    Revoke {
        /// Share ID
        share_id: String,
        /// Owner user ID
        #[arg(long)]
        owner: Uuid,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct ShareRow {
    id: String,
    #[tabled(rename = "type")]
    share_type: String,
    group: String,
    invitations: String,
    url: String,
}

impl From<&ShareDetails> for ShareRow {
    fn from(d: &ShareDetails) -> Self {
        let count = |status: InvitationStatus| {
            d.invitations.iter().filter(|i| i.status == status).count()
        };
        let invitations = if d.share.is_private() {
            format!(
                "{} pending / {} accepted / {} rejected",
                count(InvitationStatus::Pending),
                count(InvitationStatus::Accepted),
                count(InvitationStatus::Rejected)
            )
        } else {
            "-".to_string()
        };
        Self {
            id: d.share.id.to_string(),
            share_type: d.share.share_type.to_string(),
            group: d.group.name.clone(),
            invitations,
            url: d.share_url.clone(),
        }
    }
}

/// Execute share commands
pub async fn execute(
    args: &ShareArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::connect(config).await?;

    match &args.command {
        ShareCommand::List { owner } => {
            let shares = state
                .share_service
                .list_shares(UserId::from_uuid(*owner))
                .await?;
            let rows: Vec<ShareRow> = shares.iter().map(ShareRow::from).collect();
            output::print_list(&rows, format);
        }
        ShareCommand::Revoke {
            share_id,
            owner,
            force,
        } => {
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Revoke share {share_id}? Every invitation is removed with it."
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;

                if !confirmed {
                    println!("Aborted.");
                    state.stores.close().await;
                    return Ok(());
                }
            }

            state
                .share_service
                .revoke_share(&ShareId::from(share_id.as_str()), UserId::from_uuid(*owner))
                .await?;
            output::print_success(&format!("Share {share_id} revoked."));
        }
    }

    state.stores.close().await;
    Ok(())
}

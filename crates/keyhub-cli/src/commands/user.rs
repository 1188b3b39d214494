//! User record CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use keyhub_core::config::AppConfig;
use keyhub_core::error::AppError;
use keyhub_core::types::UserId;
use keyhub_entity::User;
use keyhub_service::Identity;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Insert or refresh a user record from identity-provider data
    Sync {
        /// User ID from the identity provider
        #[arg(long)]
        id: Uuid,
        /// Email address
        #[arg(long)]
        email: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
    /// List all users
    List,
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Name
    name: String,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            name: u.name.clone().unwrap_or_default(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::connect(config).await?;

    match &args.command {
        UserCommand::Sync { id, email, name } => {
            let identity = Identity::new(UserId::from_uuid(*id), email, name.clone());
            let user = state.user_service.ensure_user(&identity).await?;
            output::print_item(&UserRow::from(&user), format);
        }
        UserCommand::List => {
            let users = state.user_service.list().await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    state.stores.close().await;
    Ok(())
}

//! CLI command definitions and dispatch.

pub mod group;
pub mod migrate;
pub mod session;
pub mod share;
pub mod token;
pub mod user;

use clap::{Parser, Subcommand};

use keyhub_api::AppState;
use keyhub_core::config::AppConfig;
use keyhub_core::error::AppError;
use keyhub_database::Stores;

use crate::output::OutputFormat;

/// KeyHub: shared key/value configuration groups
#[derive(Debug, Parser)]
#[command(name = "keyhub", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/{env}`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Local user records
    User(user::UserArgs),
    /// Session tokens for local testing
    Session(session::SessionArgs),
    /// Invitation tokens
    Token(token::TokenArgs),
    /// Groups and items
    Group(group::GroupArgs),
    /// Shares
    Share(share::ShareArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_from(&self.config, &self.env)?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Session(args) => session::execute(args, &config),
            Commands::Token(args) => token::execute(args, &config, self.format),
            Commands::Group(args) => group::execute(args, &config, self.format).await,
            Commands::Share(args) => share::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: connect the configured store and build every service
pub async fn connect(config: &AppConfig) -> Result<AppState, AppError> {
    let stores = Stores::connect(&config.database).await?;
    let mailer = keyhub_mail::build_mailer(&config.mail)?;
    Ok(keyhub_api::build_state(config.clone(), stores, mailer))
}

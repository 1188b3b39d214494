//! Database migration management commands.

use clap::{Args, Subcommand};

use keyhub_core::config::AppConfig;
use keyhub_core::error::AppError;
use keyhub_database::DatabasePool;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            if config.database.is_memory() {
                output::print_warning("The in-memory store has no migrations.");
                return Ok(());
            }

            println!("Running database migrations...");
            let pool = DatabasePool::connect(&config.database).await?;
            keyhub_database::migration::run_migrations(pool.pool()).await?;
            pool.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}

//! Group and item CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use keyhub_core::config::AppConfig;
use keyhub_core::error::AppError;
use keyhub_core::types::{GroupId, UserId};
use keyhub_entity::{CreateItem, Group, GroupItem};

use crate::output::{self, OutputFormat};

/// Arguments for group commands
#[derive(Debug, Args)]
pub struct GroupArgs {
    /// Group subcommand
    #[command(subcommand)]
    pub command: GroupCommand,
}

/// Group subcommands
#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create a group
    Create {
        /// Owner user ID
        #[arg(long)]
        owner: Uuid,
        /// Group name
        #[arg(long)]
        name: String,
        /// Description
        #[arg(long)]
        description: Option<String>,
    },
    /// Add a key/value item to a group
    AddItem {
        /// Owner user ID
        #[arg(long)]
        owner: Uuid,
        /// Group ID
        #[arg(long)]
        group: Uuid,
        /// Item key
        #[arg(long)]
        key: String,
        /// Item value
        #[arg(long)]
        value: String,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Tags, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List groups of an owner, or the items of one group
    List {
        /// Owner user ID
        #[arg(long)]
        owner: Uuid,
        /// Show the items of this group instead
        #[arg(long)]
        group: Option<Uuid>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct GroupRow {
    id: String,
    name: String,
    description: String,
    created_at: String,
}

impl From<&Group> for GroupRow {
    fn from(g: &Group) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.name.clone(),
            description: g.description.clone().unwrap_or_default(),
            created_at: g.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct ItemRow {
    key: String,
    value: String,
    tags: String,
    description: String,
}

impl From<&GroupItem> for ItemRow {
    fn from(i: &GroupItem) -> Self {
        Self {
            key: i.key.clone(),
            value: i.value.clone(),
            tags: i
                .tags
                .iter()
                .map(|t| t.tag.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            description: i.description.clone().unwrap_or_default(),
        }
    }
}

/// Execute group commands
pub async fn execute(
    args: &GroupArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::connect(config).await?;
    let groups = &state.group_service;

    match &args.command {
        GroupCommand::Create {
            owner,
            name,
            description,
        } => {
            let group = groups
                .create_group(UserId::from_uuid(*owner), name, description.clone())
                .await?;
            output::print_item(&GroupRow::from(&group), format);
        }
        GroupCommand::AddItem {
            owner,
            group,
            key,
            value,
            description,
            tags,
        } => {
            let item = groups
                .add_item(
                    UserId::from_uuid(*owner),
                    GroupId::from_uuid(*group),
                    CreateItem {
                        key: key.clone(),
                        value: value.clone(),
                        description: description.clone(),
                        tags: tags.clone(),
                    },
                )
                .await?;
            output::print_item(&ItemRow::from(&item), format);
        }
        GroupCommand::List { owner, group } => {
            let owner = UserId::from_uuid(*owner);
            match group {
                Some(group) => {
                    let items = groups.list_items(owner, GroupId::from_uuid(*group)).await?;
                    let rows: Vec<ItemRow> = items.iter().map(ItemRow::from).collect();
                    output::print_list(&rows, format);
                }
                None => {
                    let list = groups.list_groups(owner).await?;
                    let rows: Vec<GroupRow> = list.iter().map(GroupRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    state.stores.close().await;
    Ok(())
}

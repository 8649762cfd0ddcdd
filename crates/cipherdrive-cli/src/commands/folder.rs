//! Folder management commands.

use clap::{Args, Subcommand};

use cipherdrive_core::error::AppError;
use cipherdrive_core::types::FolderId;

use super::{Session, confirm, enter_folder};
use crate::output::{self, FolderTableRow, OutputFormat};

/// Arguments for `tree`
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Show every folder
    #[arg(long)]
    pub expand_all: bool,
    /// Folder IDs to expand
    #[arg(long = "expand", value_name = "ID")]
    pub expand: Vec<String>,
}

/// Folder management arguments
#[derive(Debug, Args)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (omit to create at the root)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Delete a folder and its contents
    Delete {
        /// Folder ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Print the folder tree
pub async fn tree(args: &TreeArgs, vm: &Session, format: OutputFormat) -> Result<(), AppError> {
    vm.refresh_folders().await?;

    if format == OutputFormat::Json {
        output::print_item(&vm.tree().await, format);
        return Ok(());
    }

    if args.expand_all {
        vm.expand_all_folders().await;
    }
    for id in &args.expand {
        vm.toggle_folder_expanded(&FolderId::from(id.as_str())).await;
    }

    let snapshot = vm.snapshot().await;
    let rows: Vec<FolderTableRow> = snapshot.folder_rows.iter().map(FolderTableRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}

/// Execute a folder subcommand
pub async fn execute(args: &FolderArgs, vm: &Session) -> Result<(), AppError> {
    match &args.command {
        FolderCommand::Create { name, parent } => {
            enter_folder(vm, parent.as_deref()).await?;
            let folder = vm.create_folder(name).await?;
            output::print_success(&format!("Folder '{}' created (id: {})", folder.name, folder.id));
        }
        FolderCommand::Delete { id, yes } => {
            let prompt = format!("Delete folder {} and everything in it?", id);
            if !confirm(&prompt, *yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            vm.delete_folder(&FolderId::from(id.as_str())).await?;
            output::print_success(&format!("Folder {} deleted", id));
        }
    }
    Ok(())
}

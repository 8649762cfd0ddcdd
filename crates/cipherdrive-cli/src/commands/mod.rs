//! CLI command definitions and dispatch.

pub mod auth;
pub mod folder;
pub mod items;
pub mod upload;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use cipherdrive_client::HttpRepositoryClient;
use cipherdrive_core::config::ClientConfig;
use cipherdrive_core::error::AppError;
use cipherdrive_core::types::FolderId;
use cipherdrive_service::{ViewEvent, ViewModel};

use crate::output::OutputFormat;

/// CipherDrive: browse and manage an encrypted image repository
#[derive(Debug, Parser)]
#[command(name = "cipherdrive", version, about, long_about = None)]
pub struct Cli {
    /// Base path of the configuration files
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Bearer token, overriding `auth.token` from the configuration
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and print a bearer token
    Login(auth::LoginArgs),
    /// List the items of a view
    List(items::ListArgs),
    /// Show the folder tree
    Tree(folder::TreeArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Star an item
    Star(items::ItemArgs),
    /// Remove the star from an item
    Unstar(items::ItemArgs),
    /// Move an item into a folder, or back to the root
    Move(items::MoveArgs),
    /// Delete items
    Delete(items::DeleteArgs),
    /// Share items with another user
    Share(items::ShareArgs),
    /// Encrypt and upload images
    Upload(upload::UploadArgs),
    /// Decrypt an item with its key
    Decrypt(items::DecryptArgs),
    /// Save the encrypted image of an item
    Download(items::DownloadArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: ClientConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Login(args) => auth::execute(args, &config).await,
            Commands::List(args) => items::list(args, &self.session(&config)?, self.format).await,
            Commands::Tree(args) => folder::tree(args, &self.session(&config)?, self.format).await,
            Commands::Folder(args) => folder::execute(args, &self.session(&config)?).await,
            Commands::Star(args) => items::star(args, &self.session(&config)?, true).await,
            Commands::Unstar(args) => items::star(args, &self.session(&config)?, false).await,
            Commands::Move(args) => items::move_item(args, &self.session(&config)?).await,
            Commands::Delete(args) => items::delete(args, &self.session(&config)?).await,
            Commands::Share(args) => items::share(args, &self.session(&config)?).await,
            Commands::Upload(args) => upload::execute(args, &self.session(&config)?).await,
            Commands::Decrypt(args) => items::decrypt(args, &self.session(&config)?).await,
            Commands::Download(args) => items::download(args, &self.session(&config)?).await,
        }
    }

    /// Build a view model over the HTTP collaborator.
    ///
    /// The `--token` flag wins over the configured token. Without either,
    /// the view model is signed out and every command fails before any
    /// request is sent.
    fn session(&self, config: &ClientConfig) -> Result<Session, AppError> {
        let client = HttpRepositoryClient::new(&config.api, config.view.recent_limit)?;
        let mut config = config.clone();
        if let Some(token) = &self.token {
            config.auth.token = Some(token.clone());
        }
        Ok(ViewModel::new(Arc::new(client), &config))
    }
}

/// The view model every data command drives.
pub type Session = ViewModel<HttpRepositoryClient>;

/// Helper: load folders, then enter a folder view when one is given.
///
/// Folders are loaded first so the folder title and breadcrumbs resolve.
pub async fn enter_folder(vm: &Session, folder: Option<&str>) -> Result<(), AppError> {
    vm.refresh_folders().await?;
    if let Some(folder) = folder {
        vm.dispatch(ViewEvent::FolderSelected(Some(FolderId::from(folder))))
            .await;
    }
    Ok(())
}

/// Helper: ask for confirmation unless `--yes` was given.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, AppError> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}

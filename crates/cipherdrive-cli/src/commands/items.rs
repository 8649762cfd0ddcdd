//! Item listing and item mutation commands.

use std::path::PathBuf;

use clap::{ArgGroup, Args};

use cipherdrive_core::error::AppError;
use cipherdrive_core::types::{FolderId, ItemId};
use cipherdrive_entity::item::normalize_item_name;
use cipherdrive_service::{BulkOutcome, ContentView, ViewEvent, ViewSnapshot};

use super::{Session, confirm, enter_folder};
use crate::output::{self, ItemRow, OutputFormat};

/// Arguments for `list`
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("view").multiple(false)))]
pub struct ListArgs {
    /// Starred items
    #[arg(long, group = "view")]
    pub starred: bool,
    /// Recently modified items
    #[arg(long, group = "view")]
    pub recent: bool,
    /// Items shared with you
    #[arg(long, group = "view")]
    pub shared: bool,
    /// Items in a folder
    #[arg(long, group = "view")]
    pub folder: Option<String>,
    /// Search text (ignored by the starred and recent views)
    #[arg(short, long)]
    pub search: Option<String>,
}

impl ListArgs {
    fn view(&self) -> Option<ContentView> {
        if self.starred {
            Some(ContentView::Starred)
        } else if self.recent {
            Some(ContentView::Recent)
        } else if self.shared {
            Some(ContentView::Shared)
        } else {
            None
        }
    }
}

/// Arguments naming a single item
#[derive(Debug, Args)]
pub struct ItemArgs {
    /// Item ID
    pub id: String,
}

/// Arguments for `move`
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Item ID
    pub id: String,
    /// Target folder ID (omit to move the item back to the root)
    #[arg(long)]
    pub folder: Option<String>,
}

/// Arguments for `delete`
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Item IDs
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// Folder the items are listed in
    #[arg(long)]
    pub folder: Option<String>,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `share`
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Recipient email address
    #[arg(short, long)]
    pub email: String,
    /// Item IDs
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// Folder the items are listed in
    #[arg(long)]
    pub folder: Option<String>,
}

/// Arguments for `decrypt`
#[derive(Debug, Args)]
pub struct DecryptArgs {
    /// Item ID
    pub id: String,
    /// Key disclosed at upload, e.g. "(0.41, 3.9, 0.02, 1.7, 0.66)"
    #[arg(short, long)]
    pub key: String,
    /// Where to write the decrypted image
    #[arg(short, long)]
    pub out: PathBuf,
}

/// Arguments for `download`
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Item ID
    pub id: String,
    /// Where to write the encrypted image (defaults to `<name>_encrypted.tiff`)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// List the items of a view
pub async fn list(args: &ListArgs, vm: &Session, format: OutputFormat) -> Result<(), AppError> {
    enter_folder(vm, args.folder.as_deref()).await?;
    if let Some(view) = args.view() {
        vm.dispatch(ViewEvent::ViewChanged(view)).await;
    }
    if let Some(query) = &args.search {
        vm.dispatch(ViewEvent::SearchSubmitted(query.clone())).await;
    }
    vm.refresh_items().await?;

    print_view(&vm.snapshot().await, format);
    Ok(())
}

/// Print the content area of a snapshot
pub fn print_view(snapshot: &ViewSnapshot, format: OutputFormat) {
    if format == OutputFormat::Json {
        output::print_item(snapshot, format);
        return;
    }

    if snapshot.breadcrumbs.len() > 1 {
        let path: Vec<&str> = snapshot
            .breadcrumbs
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        println!("{}", path.join(" / "));
    } else {
        println!("{}", snapshot.descriptor.title);
    }

    if snapshot.is_empty() {
        println!("{}", snapshot.descriptor.empty_state_message);
        return;
    }

    let rows: Vec<ItemRow> = snapshot
        .items
        .iter()
        .map(|item| ItemRow::from_item(item, snapshot.selected.contains(&item.id)))
        .collect();
    output::print_list(&rows, format);
}

/// Star or unstar an item
pub async fn star(args: &ItemArgs, vm: &Session, starred: bool) -> Result<(), AppError> {
    let id = ItemId::from(args.id.as_str());
    if starred {
        vm.star_item(&id).await?;
        output::print_success(&format!("Starred {}", id));
    } else {
        vm.unstar_item(&id).await?;
        output::print_success(&format!("Removed star from {}", id));
    }
    Ok(())
}

/// Move an item into a folder or back to the root
pub async fn move_item(args: &MoveArgs, vm: &Session) -> Result<(), AppError> {
    let id = ItemId::from(args.id.as_str());
    let folder = args.folder.as_deref().map(FolderId::from);
    vm.move_item(&id, folder.as_ref()).await?;

    match &folder {
        Some(folder) => output::print_success(&format!("Moved {} into {}", id, folder)),
        None => output::print_success(&format!("Moved {} to the root", id)),
    }
    Ok(())
}

/// Delete items, one request per item
pub async fn delete(args: &DeleteArgs, vm: &Session) -> Result<(), AppError> {
    select_ids(vm, args.folder.as_deref(), &args.ids).await?;

    let prompt = format!("Delete {} item(s)? This cannot be undone.", args.ids.len());
    if !confirm(&prompt, args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let outcome = vm.delete_selected().await?;
    report(&outcome, "Deleted")
}

/// Share items with a recipient, one request per item
pub async fn share(args: &ShareArgs, vm: &Session) -> Result<(), AppError> {
    select_ids(vm, args.folder.as_deref(), &args.ids).await?;
    let outcome = vm.share_selected(&args.email).await?;
    report(&outcome, "Shared")
}

/// Decrypt an item and write the plaintext image
pub async fn decrypt(args: &DecryptArgs, vm: &Session) -> Result<(), AppError> {
    let id = ItemId::from(args.id.as_str());
    let bytes = vm.decrypt_item(&id, &args.key).await?;
    tokio::fs::write(&args.out, &bytes).await?;

    output::print_success(&format!(
        "Decrypted {} ({} bytes) to {}",
        id,
        bytes.len(),
        args.out.display()
    ));
    Ok(())
}

/// Save the encrypted image of an item
pub async fn download(args: &DownloadArgs, vm: &Session) -> Result<(), AppError> {
    let id = ItemId::from(args.id.as_str());
    let out = args.out.clone().unwrap_or_else(|| {
        PathBuf::from(format!("{}_encrypted.tiff", normalize_item_name(id.as_str())))
    });
    let bytes = vm.download_encrypted(&id).await?;
    tokio::fs::write(&out, &bytes).await?;

    output::print_success(&format!(
        "Downloaded {} ({} bytes) to {}",
        id,
        bytes.len(),
        out.display()
    ));
    Ok(())
}

/// Load the view the items are listed in and select them.
async fn select_ids(vm: &Session, folder: Option<&str>, ids: &[String]) -> Result<(), AppError> {
    enter_folder(vm, folder).await?;
    vm.refresh_items().await?;
    for id in ids {
        vm.select(ItemId::from(id.as_str())).await?;
    }
    Ok(())
}

fn report(outcome: &BulkOutcome, verb: &str) -> Result<(), AppError> {
    for (id, err) in &outcome.failed {
        output::print_error(&format!("{}: {}", id, err.user_message()));
    }
    if !outcome.vanished.is_empty() {
        output::print_warning(&format!(
            "{} item(s) were already gone",
            outcome.vanished.len()
        ));
    }

    match outcome.failed.first() {
        None => {
            output::print_success(&outcome.summary(verb));
            Ok(())
        }
        Some((_, first)) => Err(AppError::new(first.kind, outcome.summary(verb))),
    }
}

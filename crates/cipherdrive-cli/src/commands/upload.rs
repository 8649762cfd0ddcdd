//! Upload command with sequential key disclosure.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use cipherdrive_core::error::AppError;
use cipherdrive_entity::upload::UploadFile;
use cipherdrive_service::BatchSummary;
use cipherdrive_service::model::KeyDisclosure;
use cipherdrive_service::upload::AssignmentState;

use super::{Session, enter_folder};
use crate::output;

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Image files to encrypt and upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Folder to upload into (omit for the root)
    #[arg(long)]
    pub folder: Option<String>,
}

/// Upload files, then show each key until the user confirms saving it
pub async fn execute(args: &UploadArgs, vm: &Session) -> Result<(), AppError> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(read_file(path).await?);
    }

    enter_folder(vm, args.folder.as_deref()).await?;
    vm.submit_uploads(files).await?;
    println!("Uploading {} file(s)...", args.files.len());

    let mut summary = vm.run_uploads().await?;
    while let Some(disclosure) = vm.current_disclosure().await {
        show_key(&disclosure);
        while !acknowledge_prompt()? {
            output::print_warning("The key cannot be shown again. Save it before continuing.");
        }
        summary = vm.acknowledge_disclosure(disclosure.job_id).await?;
    }

    match summary {
        Some(summary) => report(&summary),
        None => Ok(()),
    }
}

async fn read_file(path: &Path) -> Result<UploadFile, AppError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::validation(format!("'{}' is not a file", path.display())))?;
    let data = tokio::fs::read(path).await?;
    debug!(file = %name, size = data.len(), "Read upload file");
    Ok(UploadFile::new(name, data))
}

fn show_key(disclosure: &KeyDisclosure) {
    println!();
    println!(
        "Key {}/{} for {}",
        disclosure.position, disclosure.batch_size, disclosure.file_name
    );
    output::print_kv("Item", disclosure.item_id.as_str());
    output::print_kv("Decryption key", disclosure.key.expose());
    if disclosure.assignment == AssignmentState::Failed {
        output::print_warning("The image was uploaded but could not be moved into its folder.");
    }
}

fn acknowledge_prompt() -> Result<bool, AppError> {
    dialoguer::Confirm::new()
        .with_prompt("I have saved this key")
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}

fn report(summary: &BatchSummary) -> Result<(), AppError> {
    println!();
    for (file, err) in &summary.failures {
        output::print_error(&format!("{}: {}", file, err.user_message()));
    }
    for file in &summary.unassigned {
        output::print_warning(&format!("{} stayed at the root", file));
    }

    let message = format!(
        "Uploaded {} of {} file(s)",
        summary.uploaded,
        summary.uploaded + summary.failed()
    );
    match summary.failures.first() {
        None => {
            output::print_success(&message);
            Ok(())
        }
        Some((_, first)) => Err(AppError::new(first.kind, message)),
    }
}

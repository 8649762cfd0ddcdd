//! Upload job state.

use serde::Serialize;

use cipherdrive_core::AppError;
use cipherdrive_core::types::{FolderId, ItemId, UploadJobId};
use cipherdrive_entity::upload::{DisclosedKey, UploadFile};

/// Where a job is in its lifecycle.
///
/// `Pending -> Uploading -> (Failed | Uploaded)`, then
/// `Uploaded -> Disclosing -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting to be sent.
    Pending,
    /// The upload request is in flight.
    Uploading,
    /// Stored on the server; waiting for its disclosure turn.
    Uploaded,
    /// The key is being shown to the user.
    Disclosing,
    /// The user acknowledged the key.
    Done,
    /// Rejected locally or by the server.
    Failed,
}

impl JobStatus {
    /// Whether the job has finished for good.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Progress of the optional move into the target folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    /// The job has no target folder.
    NotRequested,
    /// The move has not finished yet.
    Pending,
    /// The item is in the target folder.
    Assigned,
    /// The move failed; the item stays unfiled.
    Failed,
}

/// A move request the driver must send after an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderAssignment {
    /// The job the move belongs to.
    pub job_id: UploadJobId,
    /// The uploaded item.
    pub item_id: ItemId,
    /// Where it goes.
    pub folder_id: FolderId,
}

/// One file of an upload batch.
#[derive(Debug, Clone)]
pub struct UploadJob {
    /// Client-side job id.
    pub id: UploadJobId,
    /// The payload.
    pub file: UploadFile,
    /// Folder in context when the batch was submitted.
    pub target: Option<FolderId>,
    /// Lifecycle state.
    pub status: JobStatus,
    /// Folder assignment state.
    pub assignment: AssignmentState,
    /// Item created by the upload.
    pub item_id: Option<ItemId>,
    /// The one-time key returned by the upload.
    pub key: Option<DisclosedKey>,
    /// Why the upload failed.
    pub error: Option<AppError>,
    /// Why the folder assignment failed.
    pub assignment_error: Option<AppError>,
}

impl UploadJob {
    pub(crate) fn new(file: UploadFile, target: Option<FolderId>) -> Self {
        Self {
            id: UploadJobId::new(),
            file,
            target,
            status: JobStatus::Pending,
            assignment: AssignmentState::NotRequested,
            item_id: None,
            key: None,
            error: None,
            assignment_error: None,
        }
    }

    pub(crate) fn reject(mut self, error: AppError) -> Self {
        self.status = JobStatus::Failed;
        self.error = Some(error);
        self
    }

    /// The file name.
    pub fn file_name(&self) -> &str {
        &self.file.name
    }

    /// Whether the job is ready to show its key.
    pub(crate) fn ready_to_disclose(&self) -> bool {
        self.status == JobStatus::Uploaded && self.assignment != AssignmentState::Pending
    }
}

/// Totals reported once when a batch finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// Jobs whose keys were disclosed and acknowledged.
    pub uploaded: usize,
    /// Jobs that failed, with file name and reason.
    pub failures: Vec<(String, AppError)>,
    /// Uploaded items whose folder assignment failed.
    pub unassigned: Vec<String>,
}

impl BatchSummary {
    /// Number of failed jobs.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

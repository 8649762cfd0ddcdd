//! Sequencing of multi-file uploads and one-time key disclosure.
//!
//! The sequencer is a synchronous state machine. A driver asks it for the
//! next job to upload, performs the I/O, and records the outcome. Keys
//! are disclosed strictly in submission order, one at a time, and only
//! advance when the user acknowledges the current key. Upload completion
//! order does not matter.

use tracing::{debug, info, warn};

use cipherdrive_core::config::UploadConfig;
use cipherdrive_core::types::{FolderId, UploadJobId};
use cipherdrive_core::{AppError, AppResult};
use cipherdrive_entity::upload::{UploadFile, UploadReceipt};

use super::acceptance::check_acceptance;
use super::job::{AssignmentState, BatchSummary, FolderAssignment, JobStatus, UploadJob};

/// Drives one upload batch at a time.
#[derive(Debug, Clone)]
pub struct UploadSequencer {
    /// Acceptance limits.
    config: UploadConfig,
    /// Jobs of the current batch, in submission order.
    jobs: Vec<UploadJob>,
    /// Whether the completion of the current batch was already reported.
    completion_reported: bool,
}

impl UploadSequencer {
    /// Creates an idle sequencer.
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config,
            jobs: Vec::new(),
            completion_reported: false,
        }
    }

    /// Starts a new batch.
    ///
    /// Files that fail the acceptance rules become failed jobs right away;
    /// the rest of the batch proceeds. Rejected when a batch is still
    /// running or when no files are given.
    pub fn submit(
        &mut self,
        files: Vec<UploadFile>,
        target: Option<FolderId>,
    ) -> AppResult<Vec<UploadJobId>> {
        if self.is_active() {
            return Err(AppError::conflict("An upload batch is already in progress"));
        }
        if files.is_empty() {
            return Err(AppError::validation("No files selected for upload"));
        }

        self.jobs = files
            .into_iter()
            .map(|file| {
                let job = UploadJob::new(file, target.clone());
                match check_acceptance(&job.file, &self.config) {
                    Ok(()) => job,
                    Err(e) => {
                        warn!(file = %job.file.name, error = %e, "Upload rejected");
                        job.reject(e)
                    }
                }
            })
            .collect();
        self.completion_reported = false;

        info!(
            jobs = self.jobs.len(),
            target = ?target.as_ref().map(|f| f.as_str()),
            "Upload batch submitted"
        );
        Ok(self.jobs.iter().map(|j| j.id).collect())
    }

    /// Marks the earliest pending job as uploading and returns it.
    pub fn start_next(&mut self) -> Option<(UploadJobId, UploadFile)> {
        let job = self
            .jobs
            .iter_mut()
            .find(|j| j.status == JobStatus::Pending)?;
        job.status = JobStatus::Uploading;
        debug!(job_id = %job.id, file = %job.file.name, "Upload started");
        Some((job.id, job.file.clone()))
    }

    /// Records the result of an upload request.
    ///
    /// Returns the folder move the driver must perform next, if the job
    /// has a target folder.
    pub fn record_upload(
        &mut self,
        job_id: UploadJobId,
        result: AppResult<UploadReceipt>,
    ) -> AppResult<Option<FolderAssignment>> {
        let job = self.job_mut(job_id)?;
        if job.status != JobStatus::Uploading {
            return Err(AppError::conflict(format!(
                "Upload job {job_id} is not uploading"
            )));
        }

        let assignment = match result {
            Ok(receipt) => {
                info!(job_id = %job_id, item_id = %receipt.item_id, "Upload stored");
                job.status = JobStatus::Uploaded;
                job.item_id = Some(receipt.item_id.clone());
                job.key = Some(receipt.key);
                match job.target.clone() {
                    Some(folder_id) => {
                        job.assignment = AssignmentState::Pending;
                        Some(FolderAssignment {
                            job_id,
                            item_id: receipt.item_id,
                            folder_id,
                        })
                    }
                    None => None,
                }
            }
            Err(e) => {
                warn!(job_id = %job_id, file = %job.file.name, error = %e, "Upload failed");
                job.status = JobStatus::Failed;
                job.error = Some(e);
                None
            }
        };

        self.advance_disclosure();
        Ok(assignment)
    }

    /// Records the result of a folder move. A failure is kept on the job
    /// and never revokes the upload.
    pub fn record_assignment(&mut self, job_id: UploadJobId, result: AppResult<()>) -> AppResult<()> {
        let job = self.job_mut(job_id)?;
        if job.assignment != AssignmentState::Pending {
            return Err(AppError::conflict(format!(
                "Upload job {job_id} has no pending folder assignment"
            )));
        }

        match result {
            Ok(()) => job.assignment = AssignmentState::Assigned,
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Folder assignment failed");
                job.assignment = AssignmentState::Failed;
                job.assignment_error = Some(e);
            }
        }

        self.advance_disclosure();
        Ok(())
    }

    /// Fails every job that has not been sent yet.
    ///
    /// Used when the driver cannot start any request, so the batch still
    /// reaches completion instead of blocking later submissions. Jobs with
    /// a request in flight are left to their own outcome. Returns the
    /// number of jobs failed.
    pub fn fail_pending(&mut self, error: &AppError) -> usize {
        let mut failed = 0;
        for job in self.jobs.iter_mut().filter(|j| j.status == JobStatus::Pending) {
            job.status = JobStatus::Failed;
            job.error = Some(error.clone());
            failed += 1;
        }
        if failed > 0 {
            warn!(jobs = failed, error = %error, "Pending uploads abandoned");
            self.advance_disclosure();
        }
        failed
    }

    /// Drops the current batch, finished or not, along with any key that
    /// was not acknowledged yet.
    pub fn reset(&mut self) {
        if !self.jobs.is_empty() {
            debug!(jobs = self.jobs.len(), "Upload batch discarded");
        }
        self.jobs.clear();
        self.completion_reported = false;
    }

    /// The job whose key is currently shown, if any.
    pub fn current_disclosure(&self) -> Option<&UploadJob> {
        self.jobs.iter().find(|j| j.status == JobStatus::Disclosing)
    }

    /// Acknowledges the key currently shown and moves on to the next one.
    pub fn acknowledge(&mut self, job_id: UploadJobId) -> AppResult<()> {
        let job = self.job_mut(job_id)?;
        if job.status != JobStatus::Disclosing {
            return Err(AppError::conflict(format!(
                "The key of upload job {job_id} is not being shown"
            )));
        }
        job.status = JobStatus::Done;
        // The key is never needed again once acknowledged.
        job.key = None;
        debug!(job_id = %job_id, "Key acknowledged");

        self.advance_disclosure();
        Ok(())
    }

    /// Reports the batch summary exactly once, after every job finished.
    pub fn take_completion(&mut self) -> Option<BatchSummary> {
        if self.completion_reported || !self.is_complete() {
            return None;
        }
        self.completion_reported = true;

        let summary = BatchSummary {
            uploaded: self
                .jobs
                .iter()
                .filter(|j| j.status == JobStatus::Done)
                .count(),
            failures: self
                .jobs
                .iter()
                .filter(|j| j.status == JobStatus::Failed)
                .map(|j| {
                    let error = j
                        .error
                        .clone()
                        .unwrap_or_else(|| AppError::internal("Upload failed"));
                    (j.file_name().to_string(), error)
                })
                .collect(),
            unassigned: self
                .jobs
                .iter()
                .filter(|j| j.assignment == AssignmentState::Failed)
                .map(|j| j.file_name().to_string())
                .collect(),
        };
        info!(
            uploaded = summary.uploaded,
            failed = summary.failed(),
            "Upload batch complete"
        );
        Some(summary)
    }

    /// Whether a batch has unfinished jobs.
    pub fn is_active(&self) -> bool {
        self.jobs.iter().any(|j| !j.status.is_terminal())
    }

    /// Whether the current batch exists and every job finished.
    pub fn is_complete(&self) -> bool {
        !self.jobs.is_empty() && !self.is_active()
    }

    /// Jobs of the current batch, in submission order.
    pub fn jobs(&self) -> &[UploadJob] {
        &self.jobs
    }

    /// Looks up a job.
    pub fn job(&self, job_id: UploadJobId) -> Option<&UploadJob> {
        self.jobs.iter().find(|j| j.id == job_id)
    }

    fn job_mut(&mut self, job_id: UploadJobId) -> AppResult<&mut UploadJob> {
        self.jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(|| AppError::not_found(format!("Upload job {job_id} not found")))
    }

    /// Promotes the earliest unfinished job to `Disclosing` when it is ready.
    ///
    /// Only the earliest non-terminal job may disclose, so a later job that
    /// finished uploading first waits for every earlier job to finish.
    fn advance_disclosure(&mut self) {
        let Some(job) = self.jobs.iter_mut().find(|j| !j.status.is_terminal()) else {
            return;
        };
        if job.ready_to_disclose() {
            job.status = JobStatus::Disclosing;
            debug!(job_id = %job.id, file = %job.file.name, "Disclosing key");
        }
    }
}

#[cfg(test)]
mod tests {
    use cipherdrive_core::types::ItemId;
    use cipherdrive_entity::upload::DisclosedKey;

    use super::*;

    fn png(name: &str) -> UploadFile {
        UploadFile::new(format!("{name}.png"), vec![1u8, 2, 3])
    }

    fn receipt(item: &str) -> UploadReceipt {
        UploadReceipt {
            item_id: ItemId::from(item),
            key: DisclosedKey::new(format!("(1, 2, 3, 4, {})", item.len())).expect("key"),
        }
    }

    #[test]
    fn test_rejects_empty_and_overlapping_batches() {
        let mut seq = UploadSequencer::new(UploadConfig::default());
        assert!(seq.submit(vec![], None).is_err());
        seq.submit(vec![png("a")], None).expect("submit");
        let err = seq.submit(vec![png("b")], None).unwrap_err();
        assert_eq!(err.kind, cipherdrive_core::ErrorKind::Conflict);
    }

    #[test]
    fn test_later_upload_waits_for_earlier() {
        let mut seq = UploadSequencer::new(UploadConfig::default());
        seq.submit(vec![png("a"), png("b")], None).expect("submit");
        let (a, _) = seq.start_next().expect("a");
        let (b, _) = seq.start_next().expect("b");

        seq.record_upload(b, Ok(receipt("b"))).expect("record b");
        assert!(seq.current_disclosure().is_none());
        assert_eq!(seq.job(b).map(|j| j.status), Some(JobStatus::Uploaded));

        seq.record_upload(a, Ok(receipt("a"))).expect("record a");
        assert_eq!(seq.current_disclosure().map(|j| j.id), Some(a));

        seq.acknowledge(a).expect("ack a");
        assert_eq!(seq.current_disclosure().map(|j| j.id), Some(b));
        assert!(seq.acknowledge(a).is_err());
        seq.acknowledge(b).expect("ack b");

        let summary = seq.take_completion().expect("complete");
        assert_eq!(summary.uploaded, 2);
        assert!(seq.take_completion().is_none());
    }

    #[test]
    fn test_failed_job_is_skipped() {
        let mut seq = UploadSequencer::new(UploadConfig::default());
        seq.submit(vec![png("a"), png("b")], None).expect("submit");
        let (a, _) = seq.start_next().expect("a");
        seq.record_upload(a, Err(AppError::server("boom"))).expect("record");
        let (b, _) = seq.start_next().expect("b");
        seq.record_upload(b, Ok(receipt("b"))).expect("record");

        assert_eq!(seq.current_disclosure().map(|j| j.id), Some(b));
        seq.acknowledge(b).expect("ack");

        let summary = seq.take_completion().expect("complete");
        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures[0].0, "a.png");
    }

    #[test]
    fn test_disclosure_waits_for_assignment() {
        let mut seq = UploadSequencer::new(UploadConfig::default());
        seq.submit(vec![png("a")], Some(FolderId::from("f1")))
            .expect("submit");
        let (a, _) = seq.start_next().expect("a");
        let assignment = seq
            .record_upload(a, Ok(receipt("a")))
            .expect("record")
            .expect("assignment requested");
        assert_eq!(assignment.folder_id, FolderId::from("f1"));
        assert!(seq.current_disclosure().is_none());

        seq.record_assignment(a, Err(AppError::not_found("folder gone")))
            .expect("record assignment");
        let job = seq.current_disclosure().expect("disclosing");
        assert_eq!(job.assignment, AssignmentState::Failed);
        assert!(job.key.is_some());

        seq.acknowledge(a).expect("ack");
        let summary = seq.take_completion().expect("complete");
        assert_eq!(summary.unassigned, vec!["a.png".to_string()]);
    }

    #[test]
    fn test_fail_pending_completes_batch() {
        let mut seq = UploadSequencer::new(UploadConfig::default());
        seq.submit(vec![png("a"), png("b")], None).expect("submit");
        let (a, _) = seq.start_next().expect("a");

        let failed = seq.fail_pending(&AppError::auth_missing());
        assert_eq!(failed, 1);
        assert!(seq.is_active());

        seq.record_upload(a, Ok(receipt("a"))).expect("record a");
        seq.acknowledge(a).expect("ack a");

        let summary = seq.take_completion().expect("complete");
        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.failures[0].0, "b.png");
        assert_eq!(
            summary.failures[0].1.kind,
            cipherdrive_core::ErrorKind::Authentication
        );
        seq.submit(vec![png("c")], None).expect("next batch");
    }

    #[test]
    fn test_reset_allows_new_batch() {
        let mut seq = UploadSequencer::new(UploadConfig::default());
        seq.submit(vec![png("a")], None).expect("submit");
        seq.reset();
        assert!(!seq.is_active());
        assert!(seq.jobs().is_empty());
        assert!(seq.take_completion().is_none());
        seq.submit(vec![png("b")], None).expect("submit after reset");
    }

    #[test]
    fn test_unaccepted_file_fails_at_submission() {
        let mut seq = UploadSequencer::new(UploadConfig::default());
        let ids = seq
            .submit(
                vec![UploadFile::new("notes.txt", b"x".to_vec()), png("a")],
                None,
            )
            .expect("submit");
        assert_eq!(seq.job(ids[0]).map(|j| j.status), Some(JobStatus::Failed));
        let (next, _) = seq.start_next().expect("next");
        assert_eq!(next, ids[1]);
    }
}

//! Multi-file upload flow with sequential key disclosure.

pub mod acceptance;
pub mod job;
pub mod sequencer;

pub use acceptance::check_acceptance;
pub use job::{AssignmentState, BatchSummary, FolderAssignment, JobStatus, UploadJob};
pub use sequencer::UploadSequencer;

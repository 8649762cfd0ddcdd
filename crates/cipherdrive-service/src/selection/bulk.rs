//! Per-id results of a bulk action.

use cipherdrive_core::AppError;
use cipherdrive_core::types::ItemId;

/// How each id of a bulk delete or share ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    /// Ids the server accepted.
    pub succeeded: Vec<ItemId>,
    /// Ids the server no longer knows about.
    pub vanished: Vec<ItemId>,
    /// Ids that failed, with the reason.
    pub failed: Vec<(ItemId, AppError)>,
}

impl BulkOutcome {
    /// Sorts one per-id result into the outcome.
    pub fn record(&mut self, id: ItemId, result: Result<(), AppError>) {
        match result {
            Ok(()) => self.succeeded.push(id),
            Err(e) if e.is_not_found() => self.vanished.push(id),
            Err(e) => self.failed.push((id, e)),
        }
    }

    /// Whether every id either succeeded or had already vanished.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of ids processed.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.vanished.len() + self.failed.len()
    }

    /// One-line summary for the status area.
    pub fn summary(&self, verb: &str) -> String {
        if self.failed.is_empty() {
            format!("{verb} {} item(s)", self.succeeded.len() + self.vanished.len())
        } else {
            format!(
                "{verb} {} of {} item(s); {} failed",
                self.succeeded.len() + self.vanished.len(),
                self.total(),
                self.failed.len()
            )
        }
    }
}

//! Per-control busy flags.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use cipherdrive_core::{AppError, AppResult};

/// A user-facing control that triggers a server operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// Upload button.
    Upload,
    /// Delete selected items.
    Delete,
    /// Share selected items.
    Share,
    /// Star toggle.
    Star,
    /// Move to folder.
    Move,
    /// Create/delete folder.
    Folder,
    /// Decrypt an item.
    Decrypt,
    /// Download an encrypted artifact.
    Download,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Delete => write!(f, "delete"),
            Self::Share => write!(f, "share"),
            Self::Star => write!(f, "star"),
            Self::Move => write!(f, "move"),
            Self::Folder => write!(f, "folder"),
            Self::Decrypt => write!(f, "decrypt"),
            Self::Download => write!(f, "download"),
        }
    }
}

/// Tracks which controls have an operation in flight.
///
/// A control is disabled while its own operation runs; the others stay live.
#[derive(Debug, Clone, Default)]
pub struct BusyControls {
    busy: BTreeSet<Control>,
}

impl BusyControls {
    /// Marks a control busy, failing with `Conflict` if it already is.
    pub fn begin(&mut self, control: Control) -> AppResult<()> {
        if !self.busy.insert(control) {
            return Err(AppError::conflict(format!(
                "A {control} operation is already in progress"
            )));
        }
        Ok(())
    }

    /// Releases a control.
    pub fn end(&mut self, control: Control) {
        self.busy.remove(&control);
    }

    /// Whether the control is busy.
    pub fn is_busy(&self, control: Control) -> bool {
        self.busy.contains(&control)
    }

    /// Busy controls, in declaration order.
    pub fn active(&self) -> Vec<Control> {
        self.busy.iter().copied().collect()
    }
}

//! Folder entity model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use cipherdrive_core::types::FolderId;

/// A folder in the user's hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    #[serde(rename = "parent_folder", default)]
    pub parent_id: Option<FolderId>,
    /// When the folder was created.
    pub created_at: NaiveDateTime,
}

//! Item entity model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use cipherdrive_core::types::{FolderId, ItemId};

use super::name::normalize_item_name;

/// An encrypted image as listed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable external identifier.
    pub id: ItemId,
    /// Display name. Normalized once when the item enters the cache.
    pub name: String,
    /// Relative URL of the plaintext-safe preview image.
    #[serde(rename = "preview")]
    pub preview_path: String,
    /// Whether the user starred the item.
    #[serde(default)]
    pub starred: bool,
    /// Last modification time as reported by the server.
    pub last_modified: NaiveDateTime,
    /// Folder containing the item (None when unfiled).
    #[serde(rename = "parent_folder", default)]
    pub parent_id: Option<FolderId>,
}

impl Item {
    /// Return the item with its display name normalized.
    pub fn normalized(mut self) -> Self {
        self.name = normalize_item_name(&self.name);
        self
    }

    /// Check whether the item sits in the given folder.
    pub fn is_in(&self, folder_id: &FolderId) -> bool {
        self.parent_id.as_ref() == Some(folder_id)
    }
}

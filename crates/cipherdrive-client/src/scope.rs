//! Item collection scopes accepted by `fetch_items`.

use std::fmt;

use serde::{Deserialize, Serialize};

use cipherdrive_core::types::FolderId;

/// Which collection of items to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum FetchScope {
    /// Every item.
    All,
    /// Starred items.
    Starred,
    /// Most recently modified items.
    Recent,
    /// Items other accounts shared with the user.
    Shared,
    /// Items inside one folder.
    Folder {
        /// The folder.
        folder_id: FolderId,
    },
    /// Name search, optionally scoped to a folder.
    Search {
        /// Search text, already trimmed and non-empty.
        query: String,
        /// Folder scope filter.
        folder_id: Option<FolderId>,
    },
}

impl fmt::Display for FetchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Starred => write!(f, "starred"),
            Self::Recent => write!(f, "recent"),
            Self::Shared => write!(f, "shared"),
            Self::Folder { folder_id } => write!(f, "folder({folder_id})"),
            Self::Search {
                query,
                folder_id: Some(folder_id),
            } => write!(f, "search({query:?} in {folder_id})"),
            Self::Search {
                query,
                folder_id: None,
            } => write!(f, "search({query:?})"),
        }
    }
}

//! The active content view.

use std::fmt;

use serde::{Deserialize, Serialize};

use cipherdrive_core::config::DefaultView;
use cipherdrive_core::types::FolderId;

/// Which collection the user is looking at. Exactly one is active;
/// search is a separate modifier held next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "view", content = "folder_id", rename_all = "snake_case")]
pub enum ContentView {
    /// Every item.
    #[default]
    All,
    /// Starred items.
    Starred,
    /// Recently modified items.
    Recent,
    /// Items shared with the user.
    Shared,
    /// The contents of one folder.
    Folder(FolderId),
}

impl ContentView {
    /// The folder in context, if the view is a folder view.
    pub fn folder_id(&self) -> Option<&FolderId> {
        match self {
            Self::Folder(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the view is a fixed collection that ignores search text.
    pub fn ignores_search(&self) -> bool {
        matches!(self, Self::Starred | Self::Recent)
    }
}

impl From<DefaultView> for ContentView {
    fn from(view: DefaultView) -> Self {
        match view {
            DefaultView::All => Self::All,
            DefaultView::Starred => Self::Starred,
            DefaultView::Recent => Self::Recent,
            DefaultView::Shared => Self::Shared,
        }
    }
}

impl fmt::Display for ContentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Starred => write!(f, "starred"),
            Self::Recent => write!(f, "recent"),
            Self::Shared => write!(f, "shared"),
            Self::Folder(id) => write!(f, "folder:{id}"),
        }
    }
}

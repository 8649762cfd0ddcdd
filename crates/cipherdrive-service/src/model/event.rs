//! Events the view model reacts to and the refetches they call for.

use cipherdrive_client::Credential;
use cipherdrive_core::types::FolderId;

use crate::view::ContentView;

/// An external "dependency changed" event.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The auth collaborator supplied (or withdrew) a credential.
    CredentialChanged(Option<Credential>),
    /// The user switched views.
    ViewChanged(ContentView),
    /// The user picked a folder in the sidebar, or the root when `None`.
    FolderSelected(Option<FolderId>),
    /// The user submitted search text.
    SearchSubmitted(String),
    /// The user asked for a reload.
    Refresh,
}

/// Which collections must be fetched again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefetchPlan {
    /// Refetch the active view's items.
    pub items: bool,
    /// Refetch the folder list.
    pub folders: bool,
}

impl RefetchPlan {
    /// Nothing to do.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only the active view.
    pub fn items() -> Self {
        Self {
            items: true,
            folders: false,
        }
    }

    /// The active view and the folder list.
    pub fn all() -> Self {
        Self {
            items: true,
            folders: true,
        }
    }

    /// Whether nothing needs fetching.
    pub fn is_empty(&self) -> bool {
        !self.items && !self.folders
    }
}

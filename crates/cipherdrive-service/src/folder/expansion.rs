//! Client-only sidebar expansion state.

use std::collections::HashSet;

use cipherdrive_core::types::FolderId;
use cipherdrive_entity::folder::FolderTree;

/// The set of folders whose children are shown in the sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedFolders {
    ids: HashSet<FolderId>,
}

impl ExpandedFolders {
    /// Creates an empty expansion state (everything collapsed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips a folder's state and returns whether it is now expanded.
    pub fn toggle(&mut self, id: &FolderId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Whether the folder is expanded.
    pub fn is_expanded(&self, id: &FolderId) -> bool {
        self.ids.contains(id)
    }

    /// Expands every folder of the tree.
    pub fn expand_all(&mut self, tree: &FolderTree) {
        self.ids.extend(tree.ids());
    }

    /// Collapses everything.
    pub fn collapse_all(&mut self) {
        self.ids.clear();
    }

    /// Forgets folders that are no longer part of the tree.
    pub fn prune(&mut self, tree: &FolderTree) {
        let present: HashSet<FolderId> = tree.ids().into_iter().collect();
        self.ids.retain(|id| present.contains(id));
    }

    /// Number of expanded folders.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

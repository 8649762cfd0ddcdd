//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use cipherdrive_core::types::FolderId;

use super::model::Folder;

/// A node in a folder tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    /// The folder at this node.
    pub folder: Folder,
    /// Depth level (0 for roots).
    pub depth: usize,
    /// Child folder nodes, in server order.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Whether the node has child folders.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

// Folder chains from the server can be arbitrarily deep, so children are
// released from an explicit stack instead of by recursive drop glue.
impl Drop for FolderNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// A complete folder forest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderTree {
    /// The root node(s) of the tree.
    pub roots: Vec<FolderNode>,
    /// Total number of folders in the tree.
    pub total_folders: usize,
}

impl FolderTree {
    /// Create an empty folder tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Folder ids in depth-first display order.
    pub fn ids(&self) -> Vec<FolderId> {
        let mut out = Vec::with_capacity(self.total_folders);
        let mut stack: Vec<&FolderNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node.folder.id.clone());
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// A flattened, render-ready sidebar row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRow {
    /// Folder id.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Indentation level.
    pub depth: usize,
    /// Whether an expand/collapse toggle is shown.
    pub has_children: bool,
    /// Whether the row's children are currently shown.
    pub expanded: bool,
}

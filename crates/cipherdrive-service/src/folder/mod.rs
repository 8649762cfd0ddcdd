//! Folder hierarchy reconstruction and sidebar state.

pub mod expansion;
pub mod tree;

pub use expansion::ExpandedFolders;
pub use tree::{breadcrumbs, build_tree, visible_rows};

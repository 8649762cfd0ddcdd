//! Folder tree building and path resolution.
//!
//! The server returns folders as a flat list where each entry references
//! its parent. Nothing guarantees that list is well formed, so the builder
//! tolerates dangling parents, self references and cycles, and always
//! places every input folder in the forest exactly once.

use std::collections::{HashMap, HashSet};

use cipherdrive_core::types::FolderId;
use cipherdrive_entity::folder::{Folder, FolderNode, FolderRow, FolderTree};

use super::expansion::ExpandedFolders;

/// Builds a forest from a flat folder list.
///
/// Sibling order follows input order. Folders whose parent is absent from
/// the list become roots. A cycle that no real root reaches is re-rooted at
/// its earliest member in input order, and the back edge closing the cycle
/// is dropped. Folders hanging off such a cycle stay under their parents.
pub fn build_tree(folders: &[Folder]) -> FolderTree {
    let mut index: HashMap<&FolderId, usize> = HashMap::with_capacity(folders.len());
    for (i, folder) in folders.iter().enumerate() {
        index.entry(&folder.id).or_insert(i);
    }

    let parents: Vec<Option<usize>> = folders
        .iter()
        .map(|f| f.parent_id.as_ref().and_then(|p| index.get(p).copied()))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); folders.len()];
    let mut roots = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        match *parent {
            Some(p) if p != i => children[p].push(i),
            // Self-parented: a cycle of one.
            Some(_) => {}
            None => roots.push(i),
        }
    }

    let on_cycle = cycle_members(&parents);
    let mut visited = vec![false; folders.len()];
    let mut nodes = Vec::with_capacity(roots.len());

    for i in roots {
        attach_subtree(i, folders, &children, &mut visited, &mut nodes);
    }
    for i in 0..folders.len() {
        if !visited[i] && on_cycle[i] {
            attach_subtree(i, folders, &children, &mut visited, &mut nodes);
        }
    }
    for i in 0..folders.len() {
        if !visited[i] {
            attach_subtree(i, folders, &children, &mut visited, &mut nodes);
        }
    }

    FolderTree {
        roots: nodes,
        total_folders: folders.len(),
    }
}

/// Marks every folder whose parent chain leads back to itself.
fn cycle_members(parents: &[Option<usize>]) -> Vec<bool> {
    #[derive(Clone, Copy, PartialEq)]
    enum Walk {
        Unseen,
        OnPath,
        Settled,
    }

    let mut walk = vec![Walk::Unseen; parents.len()];
    let mut on_cycle = vec![false; parents.len()];
    let mut path = Vec::new();

    for start in 0..parents.len() {
        let mut current = Some(start);
        while let Some(i) = current {
            match walk[i] {
                Walk::Unseen => {
                    walk[i] = Walk::OnPath;
                    path.push(i);
                    current = parents[i];
                }
                Walk::OnPath => {
                    if let Some(pos) = path.iter().position(|&p| p == i) {
                        for &member in &path[pos..] {
                            on_cycle[member] = true;
                        }
                    }
                    break;
                }
                Walk::Settled => break,
            }
        }
        for i in path.drain(..) {
            walk[i] = Walk::Settled;
        }
    }

    on_cycle
}

struct Frame {
    index: usize,
    depth: usize,
    next_child: usize,
    children: Vec<FolderNode>,
}

impl Frame {
    fn new(index: usize, depth: usize) -> Self {
        Self {
            index,
            depth,
            next_child: 0,
            children: Vec::new(),
        }
    }
}

/// Depth-first build of one subtree with an explicit stack, so long parent
/// chains cannot exhaust the call stack.
fn attach_subtree(
    root: usize,
    folders: &[Folder],
    children: &[Vec<usize>],
    visited: &mut [bool],
    out: &mut Vec<FolderNode>,
) {
    visited[root] = true;
    let mut stack = vec![Frame::new(root, 0)];

    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = children[frame.index].get(frame.next_child) {
            frame.next_child += 1;
            if !visited[child] {
                visited[child] = true;
                let depth = frame.depth + 1;
                stack.push(Frame::new(child, depth));
            }
            continue;
        }

        let Some(done) = stack.pop() else { break };
        let node = FolderNode {
            folder: folders[done.index].clone(),
            depth: done.depth,
            children: done.children,
        };
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => out.push(node),
        }
    }
}

/// Flattens the tree into sidebar rows, descending only into expanded folders.
pub fn visible_rows(tree: &FolderTree, expanded: &ExpandedFolders) -> Vec<FolderRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<&FolderNode> = tree.roots.iter().rev().collect();

    while let Some(node) = stack.pop() {
        let is_expanded = expanded.is_expanded(&node.folder.id);
        rows.push(FolderRow {
            id: node.folder.id.clone(),
            name: node.folder.name.clone(),
            depth: node.depth,
            has_children: node.has_children(),
            expanded: is_expanded,
        });
        if is_expanded {
            stack.extend(node.children.iter().rev());
        }
    }

    rows
}

/// Gets the breadcrumb trail from the root to the given folder.
///
/// Returns an empty trail for an unknown folder. The walk stops at a
/// dangling parent or when it would revisit a folder.
pub fn breadcrumbs(folders: &[Folder], folder_id: &FolderId) -> Vec<Folder> {
    let by_id: HashMap<&FolderId, &Folder> = folders.iter().rev().map(|f| (&f.id, f)).collect();

    let mut trail = Vec::new();
    let mut seen: HashSet<&FolderId> = HashSet::new();
    let mut current = by_id.get(folder_id).copied();

    while let Some(folder) = current {
        if !seen.insert(&folder.id) {
            break;
        }
        trail.push(folder.clone());
        current = folder.parent_id.as_ref().and_then(|p| by_id.get(p).copied());
    }

    trail.reverse();
    trail
}

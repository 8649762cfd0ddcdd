//! Multi-item selection.

use std::collections::BTreeSet;

use cipherdrive_core::types::ItemId;

use super::bulk::BulkOutcome;

/// The set of selected item ids.
///
/// After every reload the set is a subset of the visible ids. The only
/// automatic mutation is [`SelectionSet::reconcile`]; everything else is
/// driven by the user or by a finished bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<ItemId>,
}

impl SelectionSet {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an id. Returns whether it was newly selected.
    pub fn select(&mut self, id: ItemId) -> bool {
        self.ids.insert(id)
    }

    /// Removes an id. Returns whether it was selected.
    pub fn deselect(&mut self, id: &ItemId) -> bool {
        self.ids.remove(id)
    }

    /// Flips an id and returns whether it is now selected.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Replaces the selection with exactly the given ids.
    pub fn select_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a ItemId>) {
        self.ids = visible.into_iter().cloned().collect();
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops every id that is not visible. Returns how many were dropped.
    pub fn reconcile<'a>(&mut self, visible: impl IntoIterator<Item = &'a ItemId>) -> usize {
        let visible: BTreeSet<&ItemId> = visible.into_iter().collect();
        let before = self.ids.len();
        self.ids.retain(|id| visible.contains(id));
        before - self.ids.len()
    }

    /// Copies the current selection for a bulk action.
    pub fn snapshot(&self) -> Vec<ItemId> {
        self.ids.iter().cloned().collect()
    }

    /// Removes ids a bulk action finished with; failed ids stay selected.
    pub fn apply_outcome(&mut self, outcome: &BulkOutcome) {
        for id in outcome.succeeded.iter().chain(outcome.vanished.iter()) {
            self.ids.remove(id);
        }
    }

    /// Whether the id is selected.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates the selected ids in order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }
}

//! Process state owned by the view model, and read-only views of it.

use serde::Serialize;

use cipherdrive_client::{Credential, FetchScope};
use cipherdrive_core::config::ClientConfig;
use cipherdrive_core::{AppError, AppResult};
use cipherdrive_core::types::{ItemId, UploadJobId};
use cipherdrive_entity::folder::{Folder, FolderRow, FolderTree};
use cipherdrive_entity::item::Item;
use cipherdrive_entity::upload::DisclosedKey;

use crate::context::SessionContext;
use crate::folder::{ExpandedFolders, breadcrumbs, build_tree, visible_rows};
use crate::selection::SelectionSet;
use crate::upload::{AssignmentState, UploadSequencer};
use crate::view::{ContentView, FetchDescriptor, resolve};

use super::busy::{BusyControls, Control};

/// Mutable state behind the view model's lock.
#[derive(Debug)]
pub(crate) struct ViewState {
    pub session: SessionContext,
    pub view: ContentView,
    pub query: String,
    pub descriptor: FetchDescriptor,
    pub folders: Vec<Folder>,
    pub tree: FolderTree,
    pub expanded: ExpandedFolders,
    pub items: Vec<Item>,
    pub selection: SelectionSet,
    pub uploads: UploadSequencer,
    pub busy: BusyControls,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    /// Last token handed out to any fetch.
    pub fetch_seq: u64,
    /// Token of the newest item fetch.
    pub latest_items: u64,
    /// Token of the newest folder fetch.
    pub latest_folders: u64,
}

impl ViewState {
    pub fn new(config: &ClientConfig, credential: Option<Credential>) -> Self {
        let view = ContentView::from(config.view.default_view);
        let descriptor = resolve(&view, "", &[]);
        Self {
            session: SessionContext::new(credential),
            view,
            query: String::new(),
            descriptor,
            folders: Vec::new(),
            tree: FolderTree::empty(),
            expanded: ExpandedFolders::new(),
            items: Vec::new(),
            selection: SelectionSet::new(),
            uploads: UploadSequencer::new(config.upload.clone()),
            busy: BusyControls::default(),
            loading: false,
            error: None,
            notice: None,
            fetch_seq: 0,
            latest_items: 0,
            latest_folders: 0,
        }
    }

    /// Re-resolves the descriptor. Returns whether the fetch scope changed.
    pub fn reresolve(&mut self) -> bool {
        let descriptor = resolve(&self.view, &self.query, &self.folders);
        let scope_changed = descriptor.scope != self.descriptor.scope;
        self.descriptor = descriptor;
        scope_changed
    }

    /// Switches views. Returns whether the fetch scope changed.
    pub fn change_view(&mut self, view: ContentView) -> bool {
        if self.view == view {
            return false;
        }
        self.view = view;
        self.reresolve()
    }

    /// The credential for a collaborator call, recording `AuthMissing`.
    pub fn require_auth(&mut self) -> AppResult<Credential> {
        let auth = self.session.require().cloned();
        if let Err(e) = &auth {
            self.error = Some(e.user_message());
        }
        auth
    }

    /// Records an error for display and hands it back.
    pub fn reject(&mut self, error: AppError) -> AppError {
        self.error = Some(error.user_message());
        error
    }

    /// Makes every outstanding fetch stale.
    pub fn invalidate_fetches(&mut self) {
        let token = self.next_token();
        self.latest_items = token;
        self.latest_folders = token;
        self.loading = false;
    }

    pub fn next_token(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Forgets everything tied to a previous credential, including an
    /// unfinished upload batch.
    pub fn clear_caches(&mut self) {
        self.folders.clear();
        self.tree = FolderTree::empty();
        self.expanded.collapse_all();
        self.items.clear();
        self.selection.clear();
        self.uploads.reset();
        self.reresolve();
    }

    /// Replaces the folder cache and everything derived from it.
    pub fn set_folders(&mut self, folders: Vec<Folder>) {
        self.tree = build_tree(&folders);
        self.folders = folders;
        self.expanded.prune(&self.tree);
        // Folder names feed the title; the scope cannot change here.
        self.reresolve();
    }

    /// Replaces the item cache, normalizing names, and reconciles the
    /// selection. Returns how many selected ids were dropped.
    pub fn set_items(&mut self, items: Vec<Item>) -> usize {
        self.items = items.into_iter().map(Item::normalized).collect();
        self.selection.reconcile(self.items.iter().map(|item| &item.id))
    }

    /// Drops items the server reported as gone.
    pub fn drop_items(&mut self, ids: &[ItemId]) {
        if ids.is_empty() {
            return;
        }
        self.items.retain(|item| !ids.contains(&item.id));
        for id in ids {
            self.selection.deselect(id);
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            signed_in: self.session.is_signed_in(),
            view: self.view.clone(),
            query: self.query.clone(),
            descriptor: self.descriptor.clone(),
            items: self.items.clone(),
            folder_rows: visible_rows(&self.tree, &self.expanded),
            breadcrumbs: self
                .view
                .folder_id()
                .map(|id| breadcrumbs(&self.folders, id))
                .unwrap_or_default(),
            selected: self.selection.snapshot(),
            loading: self.loading,
            error: self.error.clone(),
            notice: self.notice.clone(),
            busy: self.busy.active(),
            disclosure: self.disclosure(),
        }
    }

    pub fn disclosure(&self) -> Option<KeyDisclosure> {
        let job = self.uploads.current_disclosure()?;
        Some(KeyDisclosure {
            job_id: job.id,
            file_name: job.file.name.clone(),
            item_id: job.item_id.clone()?,
            key: job.key.clone()?,
            assignment: job.assignment,
            position: self
                .uploads
                .jobs()
                .iter()
                .position(|j| j.id == job.id)
                .map(|p| p + 1)
                .unwrap_or(1),
            batch_size: self.uploads.jobs().len(),
        })
    }
}

/// A fetch the view model issued, identified by a monotonic token.
///
/// Results are applied only if the ticket is still the newest of its kind
/// and the active view still resolves to the same scope.
#[derive(Debug, Clone)]
pub struct ItemsTicket {
    /// Issue order.
    pub token: u64,
    /// The collection requested.
    pub scope: FetchScope,
    pub(crate) auth: Credential,
}

/// A folder-list fetch.
#[derive(Debug, Clone)]
pub struct FoldersTicket {
    /// Issue order.
    pub token: u64,
    pub(crate) auth: Credential,
}

/// The key currently shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDisclosure {
    /// The upload job.
    pub job_id: UploadJobId,
    /// Name of the uploaded file.
    pub file_name: String,
    /// Item created by the upload.
    pub item_id: ItemId,
    /// The one-time key.
    pub key: DisclosedKey,
    /// Whether the item reached its target folder.
    pub assignment: AssignmentState,
    /// 1-based position of the job in its batch.
    pub position: usize,
    /// Number of jobs in the batch.
    pub batch_size: usize,
}

/// A render-ready copy of the view model's state.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    /// Whether a credential is present.
    pub signed_in: bool,
    /// Active view.
    pub view: ContentView,
    /// Search text as entered.
    pub query: String,
    /// What the content area shows.
    pub descriptor: FetchDescriptor,
    /// Cached items of the active view, in server order.
    pub items: Vec<Item>,
    /// Sidebar rows.
    pub folder_rows: Vec<FolderRow>,
    /// Path to the active folder, root first.
    pub breadcrumbs: Vec<Folder>,
    /// Selected item ids.
    pub selected: Vec<ItemId>,
    /// Whether an item fetch is outstanding.
    pub loading: bool,
    /// Last user-visible error.
    pub error: Option<String>,
    /// Last user-visible status message.
    pub notice: Option<String>,
    /// Controls with an operation in flight.
    pub busy: Vec<Control>,
    /// The key being shown, if any.
    #[serde(skip)]
    pub disclosure: Option<KeyDisclosure>,
}

impl ViewSnapshot {
    /// Whether the content area shows its empty state.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_uses_default_view() {
        let mut config = ClientConfig::default();
        config.view.default_view = cipherdrive_core::config::DefaultView::Starred;
        let state = ViewState::new(&config, None);
        assert_eq!(state.view, ContentView::Starred);
        assert_eq!(state.descriptor.scope, FetchScope::Starred);
        assert!(!state.snapshot().signed_in);
    }
}

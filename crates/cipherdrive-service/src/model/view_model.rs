//! The content view model.
//!
//! Owns the process state (credential, active view, caches, selection,
//! upload batch) and is its single writer. State sits behind a lock that
//! is never held across a collaborator call, so several network operations
//! can be in flight at once while state changes stay serialized.

use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use cipherdrive_client::{Credential, RepositoryApi};
use cipherdrive_core::config::ClientConfig;
use cipherdrive_core::types::{FolderId, ItemId, UploadJobId};
use cipherdrive_core::{AppError, AppResult};
use cipherdrive_entity::folder::{Folder, FolderTree};
use cipherdrive_entity::item::Item;
use cipherdrive_entity::share::{Recipient, ShareRequest};
use cipherdrive_entity::upload::{DisclosedKey, UploadFile};

use crate::selection::BulkOutcome;
use crate::upload::BatchSummary;
use crate::view::ContentView;

use super::busy::Control;
use super::event::{RefetchPlan, ViewEvent};
use super::state::{FoldersTicket, ItemsTicket, KeyDisclosure, ViewSnapshot, ViewState};

/// Orchestrates views, caches, selection and uploads against a repository.
pub struct ViewModel<C: RepositoryApi> {
    /// Server collaborator.
    api: Arc<C>,
    /// Process state.
    state: RwLock<ViewState>,
}

impl<C: RepositoryApi> ViewModel<C> {
    /// Creates a view model, taking the credential from configuration.
    pub fn new(api: Arc<C>, config: &ClientConfig) -> Self {
        let credential = Credential::from_optional(config.auth.token.as_deref());
        Self::with_credential(api, config, credential)
    }

    /// Creates a view model with an explicit credential.
    pub fn with_credential(
        api: Arc<C>,
        config: &ClientConfig,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            api,
            state: RwLock::new(ViewState::new(config, credential)),
        }
    }

    /// A render-ready copy of the current state.
    pub async fn snapshot(&self) -> ViewSnapshot {
        self.state.read().await.snapshot()
    }

    /// The folder forest built from the folder cache.
    pub async fn tree(&self) -> FolderTree {
        self.state.read().await.tree.clone()
    }

    /// The folder cache, in server order.
    pub async fn folders(&self) -> Vec<Folder> {
        self.state.read().await.folders.clone()
    }

    // ── Events ──────────────────────────────────────────────────────

    /// Applies an event and reports which collections must be refetched.
    ///
    /// Nothing is fetched when the event leaves the resolved fetch scope
    /// unchanged. Selection and upload changes never come through here.
    pub async fn dispatch(&self, event: ViewEvent) -> RefetchPlan {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.error = None;

        match event {
            ViewEvent::CredentialChanged(credential) => {
                let signed_in = credential.is_some();
                if !state.session.replace(credential) {
                    return RefetchPlan::none();
                }
                state.invalidate_fetches();
                state.clear_caches();
                info!(signed_in, "Credential changed");
                if signed_in {
                    RefetchPlan::all()
                } else {
                    RefetchPlan::none()
                }
            }
            ViewEvent::ViewChanged(view) => change_view(state, view),
            ViewEvent::FolderSelected(folder_id) => {
                let view = folder_id.map_or(ContentView::All, ContentView::Folder);
                change_view(state, view)
            }
            ViewEvent::SearchSubmitted(query) => {
                if state.query == query {
                    return RefetchPlan::none();
                }
                state.query = query;
                if state.reresolve() {
                    info!(query = %state.query.trim(), "Search changed");
                    RefetchPlan::items()
                } else {
                    RefetchPlan::none()
                }
            }
            ViewEvent::Refresh => RefetchPlan::all(),
        }
    }

    /// Applies an event and performs the refetches it calls for.
    pub async fn handle(&self, event: ViewEvent) -> AppResult<RefetchPlan> {
        let plan = self.dispatch(event).await;
        self.run_plan(plan).await?;
        Ok(plan)
    }

    /// Performs the requested refetches concurrently.
    pub async fn run_plan(&self, plan: RefetchPlan) -> AppResult<()> {
        let folders = async {
            if plan.folders {
                self.refresh_folders().await
            } else {
                Ok(())
            }
        };
        let items = async {
            if plan.items {
                self.refresh_items().await
            } else {
                Ok(())
            }
        };
        let (folders, items) = tokio::join!(folders, items);
        folders.and(items)
    }

    /// Refetches the active view and the folder list.
    pub async fn refresh(&self) -> AppResult<()> {
        self.run_plan(RefetchPlan::all()).await
    }

    // ── Fetching ────────────────────────────────────────────────────

    /// Issues a new item fetch for the active view.
    pub async fn begin_items_fetch(&self) -> AppResult<ItemsTicket> {
        let mut state = self.state.write().await;
        let auth = state.require_auth()?;
        let token = state.next_token();
        state.latest_items = token;
        state.loading = true;
        debug!(token, scope = %state.descriptor.scope, "Fetching items");
        Ok(ItemsTicket {
            token,
            scope: state.descriptor.scope.clone(),
            auth,
        })
    }

    /// Performs the request of an item ticket.
    pub async fn fetch_items(&self, ticket: &ItemsTicket) -> AppResult<Vec<Item>> {
        self.api.fetch_items(&ticket.auth, &ticket.scope).await
    }

    /// Applies an item response. Returns `Ok(false)` when the response is
    /// stale: a newer fetch was issued or the view moved on.
    pub async fn apply_items(
        &self,
        ticket: ItemsTicket,
        result: AppResult<Vec<Item>>,
    ) -> AppResult<bool> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        if ticket.token != state.latest_items || ticket.scope != state.descriptor.scope {
            debug!(
                token = ticket.token,
                latest = state.latest_items,
                scope = %ticket.scope,
                "Discarding stale item response"
            );
            return Ok(false);
        }
        state.loading = false;

        match result {
            Ok(items) => {
                let count = items.len();
                let dropped = state.set_items(items);
                debug!(token = ticket.token, count, dropped, "Items applied");
                Ok(true)
            }
            Err(e) => {
                warn!(scope = %ticket.scope, error = %e, "Item fetch failed");
                Err(state.reject(e))
            }
        }
    }

    /// Fetches the active view and applies the result.
    pub async fn refresh_items(&self) -> AppResult<()> {
        let ticket = self.begin_items_fetch().await?;
        let result = self.fetch_items(&ticket).await;
        self.apply_items(ticket, result).await.map(|_| ())
    }

    /// Issues a new folder-list fetch.
    pub async fn begin_folders_fetch(&self) -> AppResult<FoldersTicket> {
        let mut state = self.state.write().await;
        let auth = state.require_auth()?;
        let token = state.next_token();
        state.latest_folders = token;
        debug!(token, "Fetching folders");
        Ok(FoldersTicket { token, auth })
    }

    /// Performs the request of a folder ticket.
    pub async fn fetch_folders(&self, ticket: &FoldersTicket) -> AppResult<Vec<Folder>> {
        self.api.fetch_folders(&ticket.auth).await
    }

    /// Applies a folder response, rebuilding the tree. Stale responses are
    /// discarded.
    pub async fn apply_folders(
        &self,
        ticket: FoldersTicket,
        result: AppResult<Vec<Folder>>,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if ticket.token != state.latest_folders {
            debug!(
                token = ticket.token,
                latest = state.latest_folders,
                "Discarding stale folder response"
            );
            return Ok(false);
        }

        match result {
            Ok(folders) => {
                debug!(token = ticket.token, count = folders.len(), "Folders applied");
                state.set_folders(folders);
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Folder fetch failed");
                Err(state.reject(e))
            }
        }
    }

    /// Fetches the folder list and applies the result.
    pub async fn refresh_folders(&self) -> AppResult<()> {
        let ticket = self.begin_folders_fetch().await?;
        let result = self.fetch_folders(&ticket).await;
        self.apply_folders(ticket, result).await.map(|_| ())
    }

    // ── Selection and sidebar ───────────────────────────────────────

    /// Selects a visible item.
    pub async fn select(&self, item_id: ItemId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.items.iter().any(|item| item.id == item_id) {
            return Err(AppError::not_found(format!(
                "Item {item_id} is not in the current view"
            )));
        }
        state.selection.select(item_id);
        Ok(())
    }

    /// Deselects an item. Returns whether it was selected.
    pub async fn deselect(&self, item_id: &ItemId) -> bool {
        self.state.write().await.selection.deselect(item_id)
    }

    /// Flips the selection of a visible item. Returns whether it is now selected.
    pub async fn toggle_selected(&self, item_id: ItemId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if !state.selection.contains(&item_id) && !state.items.iter().any(|i| i.id == item_id) {
            return Err(AppError::not_found(format!(
                "Item {item_id} is not in the current view"
            )));
        }
        Ok(state.selection.toggle(item_id))
    }

    /// Selects exactly the visible items. Returns how many are selected.
    pub async fn select_all_visible(&self) -> usize {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.selection.select_all(state.items.iter().map(|item| &item.id));
        state.selection.len()
    }

    /// Deselects everything.
    pub async fn clear_selection(&self) {
        self.state.write().await.selection.clear();
    }

    /// Flips a folder's expansion in the sidebar.
    pub async fn toggle_folder_expanded(&self, folder_id: &FolderId) -> bool {
        self.state.write().await.expanded.toggle(folder_id)
    }

    /// Expands every folder in the sidebar.
    pub async fn expand_all_folders(&self) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.expanded.expand_all(&state.tree);
    }

    // ── Single-item mutations ───────────────────────────────────────

    /// Stars an item.
    pub async fn star_item(&self, item_id: &ItemId) -> AppResult<()> {
        self.set_star(item_id, true).await
    }

    /// Removes the star from an item.
    pub async fn unstar_item(&self, item_id: &ItemId) -> AppResult<()> {
        self.set_star(item_id, false).await
    }

    /// Flips the star of a cached item. Returns the new state.
    pub async fn toggle_star(&self, item_id: &ItemId) -> AppResult<bool> {
        let starred = {
            let state = self.state.read().await;
            state
                .items
                .iter()
                .find(|item| &item.id == item_id)
                .map(|item| item.starred)
        };
        let starred = match starred {
            Some(starred) => starred,
            None => {
                let e = AppError::not_found(format!("Item {item_id} is not in the current view"));
                return Err(self.reject(e).await);
            }
        };
        self.set_star(item_id, !starred).await?;
        Ok(!starred)
    }

    async fn set_star(&self, item_id: &ItemId, starred: bool) -> AppResult<()> {
        let auth = self.begin(Control::Star).await?;
        let result = if starred {
            self.api.star_item(&auth, item_id).await
        } else {
            self.api.unstar_item(&auth, item_id).await
        };
        self.finish(Control::Star, Some(item_id), &result).await;
        result?;

        info!(item_id = %item_id, starred, "Star updated");
        self.refresh_items().await
    }

    /// Moves an item into a folder, or back to the root when `folder_id` is None.
    pub async fn move_item(&self, item_id: &ItemId, folder_id: Option<&FolderId>) -> AppResult<()> {
        let auth = self.begin(Control::Move).await?;
        let result = self.api.move_item(&auth, item_id, folder_id).await;
        self.finish(Control::Move, Some(item_id), &result).await;
        result?;

        info!(
            item_id = %item_id,
            folder_id = ?folder_id.map(|f| f.as_str()),
            "Item moved"
        );
        self.refresh_items().await
    }

    /// Decrypts an item with a user-entered key.
    pub async fn decrypt_item(&self, item_id: &ItemId, key: &str) -> AppResult<Bytes> {
        let key = match DisclosedKey::parse(key) {
            Ok(key) => key,
            Err(e) => return Err(self.reject(e).await),
        };

        let auth = self.begin(Control::Decrypt).await?;
        let result = self.api.decrypt_item(&auth, item_id, &key).await;
        self.finish(Control::Decrypt, Some(item_id), &result).await;
        let bytes = result?;

        info!(item_id = %item_id, size = bytes.len(), "Item decrypted");
        Ok(bytes)
    }

    /// Downloads the encrypted image of an item, for decryption elsewhere.
    pub async fn download_encrypted(&self, item_id: &ItemId) -> AppResult<Bytes> {
        let auth = self.begin(Control::Download).await?;
        let result = self.api.download_encrypted(&auth, item_id).await;
        self.finish(Control::Download, Some(item_id), &result).await;
        let bytes = result?;

        info!(item_id = %item_id, size = bytes.len(), "Encrypted image downloaded");
        Ok(bytes)
    }

    // ── Folder mutations ────────────────────────────────────────────

    /// Creates a folder inside the active folder, or at the root.
    pub async fn create_folder(&self, name: &str) -> AppResult<Folder> {
        let name = name.trim();
        if name.is_empty() {
            let e = AppError::validation("Folder name cannot be empty");
            return Err(self.reject(e).await);
        }

        let auth = self.begin(Control::Folder).await?;
        let parent_id = self.state.read().await.view.folder_id().cloned();
        let result = self
            .api
            .create_folder(&auth, name, parent_id.as_ref())
            .await;
        self.finish(Control::Folder, None, &result).await;
        let folder = result?;

        info!(
            folder_id = %folder.id,
            name = %folder.name,
            parent_id = ?parent_id.as_ref().map(|p| p.as_str()),
            "Folder created"
        );
        self.run_plan(RefetchPlan::all()).await?;
        Ok(folder)
    }

    /// Deletes a folder. Leaves the folder view first if it is active.
    pub async fn delete_folder(&self, folder_id: &FolderId) -> AppResult<()> {
        let auth = self.begin(Control::Folder).await?;
        let result = self.api.delete_folder(&auth, folder_id).await;
        self.finish(Control::Folder, None, &result).await;

        match result {
            Ok(()) => info!(folder_id = %folder_id, "Folder deleted"),
            Err(e) if e.is_not_found() => {
                let mut state = self.state.write().await;
                let remaining: Vec<Folder> = state
                    .folders
                    .iter()
                    .filter(|f| &f.id != folder_id)
                    .cloned()
                    .collect();
                state.set_folders(remaining);
                if state.view.folder_id() == Some(folder_id) {
                    state.change_view(ContentView::All);
                }
                drop(state);
                self.run_plan(RefetchPlan::all()).await?;
                return Err(e);
            }
            Err(e) => return Err(e),
        }

        {
            let mut state = self.state.write().await;
            if state.view.folder_id() == Some(folder_id) {
                state.change_view(ContentView::All);
            }
        }
        self.run_plan(RefetchPlan::all()).await
    }

    // ── Bulk mutations ──────────────────────────────────────────────

    /// Deletes every selected item, one request per id.
    ///
    /// Deleted and vanished ids leave the selection and the cache; failed
    /// ids stay selected for a retry.
    pub async fn delete_selected(&self) -> AppResult<BulkOutcome> {
        let (auth, ids) = self.begin_bulk(Control::Delete).await?;

        let results = join_all(ids.iter().map(|id| self.api.delete_item(&auth, id))).await;
        let mut outcome = BulkOutcome::default();
        for (id, result) in ids.into_iter().zip(results) {
            outcome.record(id, result);
        }

        self.finish_bulk(Control::Delete, &outcome, "Deleted", true)
            .await;
        if !outcome.succeeded.is_empty() {
            self.refresh_items().await?;
        }
        Ok(outcome)
    }

    /// Shares every selected item with a recipient, one request per id.
    pub async fn share_selected(&self, email: &str) -> AppResult<BulkOutcome> {
        let recipient = match Recipient::parse(email) {
            Ok(recipient) => recipient,
            Err(e) => return Err(self.reject(e).await),
        };
        let (auth, ids) = self.begin_bulk(Control::Share).await?;

        let results = join_all(ids.iter().map(|id| {
            let recipient = recipient.clone();
            let auth = &auth;
            async move {
                let request = ShareRequest::new(vec![id.clone()], recipient)?;
                self.api.share_items(auth, &request).await
            }
        }))
        .await;
        let mut outcome = BulkOutcome::default();
        for (id, result) in ids.into_iter().zip(results) {
            outcome.record(id, result);
        }

        info!(recipient = %recipient.as_str(), "Share finished");
        self.finish_bulk(Control::Share, &outcome, "Shared", false)
            .await;
        if !outcome.succeeded.is_empty() {
            self.refresh_items().await?;
        }
        Ok(outcome)
    }

    // ── Uploads ─────────────────────────────────────────────────────

    /// Submits files and uploads them in order.
    ///
    /// Returns once every upload request finished. Keys are then disclosed
    /// through [`ViewModel::current_disclosure`] and
    /// [`ViewModel::acknowledge_disclosure`].
    pub async fn upload_files(&self, files: Vec<UploadFile>) -> AppResult<Vec<UploadJobId>> {
        let ids = self.submit_uploads(files).await?;
        self.run_uploads().await?;
        Ok(ids)
    }

    /// Starts an upload batch targeting the active folder. Marks the upload
    /// control busy until [`ViewModel::run_uploads`] finishes.
    pub async fn submit_uploads(&self, files: Vec<UploadFile>) -> AppResult<Vec<UploadJobId>> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.error = None;
        state.require_auth()?;
        state
            .busy
            .begin(Control::Upload)
            .map_err(|e| state.reject(e))?;

        let target = state.view.folder_id().cloned();
        match state.uploads.submit(files, target) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                state.busy.end(Control::Upload);
                Err(state.reject(e))
            }
        }
    }

    /// Uploads every pending job in submission order, then moves each
    /// uploaded item into its target folder.
    ///
    /// Returns the batch summary if the batch already finished, which only
    /// happens when no job has a key left to disclose.
    pub async fn run_uploads(&self) -> AppResult<Option<BatchSummary>> {
        let driven = self.drive_uploads().await;
        let summary = {
            let mut state = self.state.write().await;
            state.busy.end(Control::Upload);
            state.uploads.take_completion()
        };
        driven?;

        if let Some(summary) = &summary {
            self.complete_batch(summary).await?;
        }
        Ok(summary)
    }

    async fn drive_uploads(&self) -> AppResult<()> {
        let auth = {
            let mut state = self.state.write().await;
            match state.require_auth() {
                Ok(auth) => auth,
                Err(e) => {
                    state.uploads.fail_pending(&e);
                    return Err(e);
                }
            }
        };

        loop {
            let next = self.state.write().await.uploads.start_next();
            let Some((job_id, file)) = next else {
                break;
            };

            let result = self.api.upload_file(&auth, &file).await;
            let assignment = self
                .state
                .write()
                .await
                .uploads
                .record_upload(job_id, result)?;

            if let Some(assignment) = assignment {
                let moved = self
                    .api
                    .move_item(&auth, &assignment.item_id, Some(&assignment.folder_id))
                    .await;
                self.state
                    .write()
                    .await
                    .uploads
                    .record_assignment(job_id, moved)?;
            }
        }
        Ok(())
    }

    /// The key currently shown to the user, if any.
    pub async fn current_disclosure(&self) -> Option<KeyDisclosure> {
        self.state.read().await.disclosure()
    }

    /// Acknowledges the key currently shown.
    ///
    /// After the last acknowledgment of a batch the active view is
    /// refetched once and the batch summary is returned.
    pub async fn acknowledge_disclosure(&self, job_id: UploadJobId) -> AppResult<Option<BatchSummary>> {
        let summary = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;
            state
                .uploads
                .acknowledge(job_id)
                .map_err(|e| state.reject(e))?;
            state.uploads.take_completion()
        };

        if let Some(summary) = &summary {
            self.complete_batch(summary).await?;
        }
        Ok(summary)
    }

    async fn complete_batch(&self, summary: &BatchSummary) -> AppResult<()> {
        {
            let mut state = self.state.write().await;
            let mut notice = format!("Uploaded {} file(s)", summary.uploaded);
            if summary.failed() > 0 {
                notice.push_str(&format!("; {} failed", summary.failed()));
            }
            if !summary.unassigned.is_empty() {
                notice.push_str(&format!(
                    "; {} could not be moved into the folder",
                    summary.unassigned.len()
                ));
            }
            state.notice = Some(notice);
            if let Some((name, e)) = summary.failures.first() {
                state.error = Some(format!("{name}: {}", e.user_message()));
            }
        }

        if summary.uploaded > 0 {
            self.refresh_items().await?;
        }
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────────

    async fn reject(&self, error: AppError) -> AppError {
        self.state.write().await.reject(error)
    }

    /// Checks the credential and marks the control busy.
    async fn begin(&self, control: Control) -> AppResult<Credential> {
        let mut state = self.state.write().await;
        state.error = None;
        let auth = state.require_auth()?;
        state.busy.begin(control).map_err(|e| state.reject(e))?;
        Ok(auth)
    }

    /// Releases the control and records a failure. An item the server no
    /// longer knows is dropped from the cache.
    async fn finish<T>(&self, control: Control, item_id: Option<&ItemId>, result: &AppResult<T>) {
        let mut state = self.state.write().await;
        state.busy.end(control);

        if let Err(e) = result {
            warn!(control = %control, error = %e, "Operation failed");
            state.error = Some(e.user_message());
            if let Some(item_id) = item_id.filter(|_| e.is_not_found()) {
                state.drop_items(std::slice::from_ref(item_id));
            }
        }
    }

    /// Checks the credential, snapshots the selection and marks the control busy.
    async fn begin_bulk(&self, control: Control) -> AppResult<(Credential, Vec<ItemId>)> {
        let mut state = self.state.write().await;
        state.error = None;
        let auth = state.require_auth()?;

        let ids = state.selection.snapshot();
        if ids.is_empty() {
            return Err(state.reject(AppError::validation("No items selected")));
        }
        state.busy.begin(control).map_err(|e| state.reject(e))?;
        Ok((auth, ids))
    }

    async fn finish_bulk(
        &self,
        control: Control,
        outcome: &BulkOutcome,
        verb: &str,
        removes_items: bool,
    ) {
        let mut state = self.state.write().await;
        state.busy.end(control);
        state.selection.apply_outcome(outcome);
        if removes_items {
            state.drop_items(&outcome.succeeded);
        }
        state.drop_items(&outcome.vanished);

        for (id, e) in &outcome.failed {
            warn!(action = verb, item_id = %id, error = %e, "Bulk action failed for item");
        }
        info!(
            action = verb,
            succeeded = outcome.succeeded.len(),
            vanished = outcome.vanished.len(),
            failed = outcome.failed.len(),
            "Bulk action finished"
        );

        state.notice = Some(outcome.summary(verb));
        if !outcome.is_complete() {
            state.error = Some(outcome.summary(verb));
        }
    }
}

fn change_view(state: &mut ViewState, view: ContentView) -> RefetchPlan {
    let label = view.to_string();
    if state.view == view {
        return RefetchPlan::none();
    }
    if state.change_view(view) {
        info!(view = %label, "View changed");
        RefetchPlan::items()
    } else {
        debug!(view = %label, "View changed without a new fetch scope");
        RefetchPlan::none()
    }
}

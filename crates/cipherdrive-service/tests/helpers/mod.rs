//! Shared test helpers for view model integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime};

use cipherdrive_client::{Credential, FetchScope, RepositoryApi};
use cipherdrive_core::config::ClientConfig;
use cipherdrive_core::types::{FolderId, ItemId};
use cipherdrive_core::{AppError, AppResult};
use cipherdrive_entity::folder::Folder;
use cipherdrive_entity::item::Item;
use cipherdrive_entity::share::ShareRequest;
use cipherdrive_entity::upload::{DisclosedKey, UploadFile, UploadReceipt};
use cipherdrive_service::ViewModel;

/// Token accepted by the fake server.
pub const TOKEN: &str = "test-token";

/// In-memory state of the fake server.
#[derive(Debug, Default)]
pub struct FakeServer {
    pub items: Vec<Item>,
    pub shared: Vec<Item>,
    pub folders: Vec<Folder>,
    /// Every call, as `"op:arg"`.
    pub calls: Vec<String>,
    /// Ids whose delete/share fails with a server error.
    pub failing: HashSet<ItemId>,
    /// File names whose upload fails.
    pub failing_uploads: HashSet<String>,
    /// Whether folder moves fail.
    pub failing_moves: bool,
    /// Recipients and item ids of successful shares.
    pub shares: Vec<(String, ItemId)>,
    uploads: usize,
}

/// A fake repository collaborator backed by [`FakeServer`].
#[derive(Debug, Default)]
pub struct FakeRepository {
    pub server: Mutex<FakeServer>,
}

impl FakeRepository {
    /// Creates a fake with items and folders.
    pub fn with(items: Vec<Item>, folders: Vec<Folder>) -> Self {
        Self {
            server: Mutex::new(FakeServer {
                items,
                folders,
                ..FakeServer::default()
            }),
        }
    }

    /// Runs a closure against the server state.
    pub fn server<R>(&self, f: impl FnOnce(&mut FakeServer) -> R) -> R {
        let mut server = self.server.lock().expect("fake server lock");
        f(&mut server)
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.server(|s| s.calls.clone())
    }

    /// Number of recorded calls starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.server(|s| s.calls.iter().filter(|c| c.starts_with(prefix)).count())
    }

    /// Forgets recorded calls.
    pub fn reset_calls(&self) {
        self.server(|s| s.calls.clear());
    }

    fn record(&self, auth: &Credential, call: String) -> AppResult<()> {
        self.server(|s| s.calls.push(call));
        if auth.bearer() != TOKEN {
            return Err(AppError::authentication("Invalid token"));
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryApi for FakeRepository {
    async fn fetch_items(&self, auth: &Credential, scope: &FetchScope) -> AppResult<Vec<Item>> {
        self.record(auth, format!("fetch_items:{scope}"))?;
        Ok(self.server(|s| match scope {
            FetchScope::All => s.items.clone(),
            FetchScope::Starred => s.items.iter().filter(|i| i.starred).cloned().collect(),
            FetchScope::Recent => s.items.iter().take(5).cloned().collect(),
            FetchScope::Shared => s.shared.clone(),
            FetchScope::Folder { folder_id } => s
                .items
                .iter()
                .filter(|i| i.is_in(folder_id))
                .cloned()
                .collect(),
            FetchScope::Search { query, folder_id } => s
                .items
                .iter()
                .filter(|i| i.name.contains(query.as_str()))
                .filter(|i| folder_id.as_ref().is_none_or(|f| i.is_in(f)))
                .cloned()
                .collect(),
        }))
    }

    async fn fetch_folders(&self, auth: &Credential) -> AppResult<Vec<Folder>> {
        self.record(auth, "fetch_folders".to_string())?;
        Ok(self.server(|s| s.folders.clone()))
    }

    async fn create_folder(
        &self,
        auth: &Credential,
        name: &str,
        parent_id: Option<&FolderId>,
    ) -> AppResult<Folder> {
        self.record(auth, format!("create_folder:{name}"))?;
        let folder = self.server(|s| {
            let folder = Folder {
                id: FolderId::new(format!("folder-{}", s.folders.len() + 1)),
                name: name.to_string(),
                parent_id: parent_id.cloned(),
                created_at: timestamp(0),
            };
            s.folders.push(folder.clone());
            folder
        });
        Ok(folder)
    }

    async fn delete_folder(&self, auth: &Credential, folder_id: &FolderId) -> AppResult<()> {
        self.record(auth, format!("delete_folder:{folder_id}"))?;
        self.server(|s| {
            let before = s.folders.len();
            s.folders.retain(|f| &f.id != folder_id);
            if s.folders.len() == before {
                return Err(AppError::not_found("Folder not found"));
            }
            s.items.retain(|i| !i.is_in(folder_id));
            Ok(())
        })
    }

    async fn star_item(&self, auth: &Credential, item_id: &ItemId) -> AppResult<()> {
        self.record(auth, format!("star_item:{item_id}"))?;
        self.set_starred(item_id, true)
    }

    async fn unstar_item(&self, auth: &Credential, item_id: &ItemId) -> AppResult<()> {
        self.record(auth, format!("unstar_item:{item_id}"))?;
        self.set_starred(item_id, false)
    }

    async fn delete_item(&self, auth: &Credential, item_id: &ItemId) -> AppResult<()> {
        self.record(auth, format!("delete_item:{item_id}"))?;
        self.server(|s| {
            if s.failing.contains(item_id) {
                return Err(AppError::server("Storage unavailable"));
            }
            let before = s.items.len();
            s.items.retain(|i| &i.id != item_id);
            if s.items.len() == before {
                return Err(AppError::not_found("Item not found"));
            }
            Ok(())
        })
    }

    async fn move_item(
        &self,
        auth: &Credential,
        item_id: &ItemId,
        folder_id: Option<&FolderId>,
    ) -> AppResult<()> {
        let target = folder_id.map(|f| f.as_str()).unwrap_or("root");
        self.record(auth, format!("move_item:{item_id}->{target}"))?;
        self.server(|s| {
            if s.failing_moves {
                return Err(AppError::server("Move failed"));
            }
            let item = s
                .items
                .iter_mut()
                .find(|i| &i.id == item_id)
                .ok_or_else(|| AppError::not_found("Item not found"))?;
            item.parent_id = folder_id.cloned();
            Ok(())
        })
    }

    async fn share_items(&self, auth: &Credential, request: &ShareRequest) -> AppResult<()> {
        let ids: Vec<&str> = request.item_ids.iter().map(|i| i.as_str()).collect();
        self.record(auth, format!("share_items:{}", ids.join(",")))?;
        self.server(|s| {
            for id in &request.item_ids {
                if s.failing.contains(id) {
                    return Err(AppError::server("Share failed"));
                }
                if !s.items.iter().any(|i| &i.id == id) {
                    return Err(AppError::not_found("Image not found"));
                }
            }
            for id in &request.item_ids {
                s.shares
                    .push((request.email.as_str().to_string(), id.clone()));
            }
            Ok(())
        })
    }

    async fn upload_file(&self, auth: &Credential, file: &UploadFile) -> AppResult<UploadReceipt> {
        self.record(auth, format!("upload_file:{}", file.name))?;
        self.server(|s| {
            if s.failing_uploads.contains(&file.name) {
                return Err(AppError::server("Encryption failed"));
            }
            s.uploads += 1;
            let stem = file.name.split('.').next().unwrap_or("file").to_string();
            let id = ItemId::new(format!("{stem}_encrypted_preview"));
            s.items.push(Item {
                id: id.clone(),
                name: format!("{stem}_encrypted_preview"),
                preview_path: format!("/api/preview/{stem}_encrypted_preview"),
                starred: false,
                last_modified: timestamp(s.uploads as u32),
                parent_id: None,
            });
            Ok(UploadReceipt {
                item_id: id,
                key: DisclosedKey::new(format!("(0.{}, 1.5, 2.5, 3.5, 4.5)", s.uploads))?,
            })
        })
    }

    async fn decrypt_item(
        &self,
        auth: &Credential,
        item_id: &ItemId,
        key: &DisclosedKey,
    ) -> AppResult<Bytes> {
        self.record(auth, format!("decrypt_item:{item_id}"))?;
        if key.expose().starts_with("(9") {
            return Err(AppError::validation("Wrong key"));
        }
        Ok(Bytes::from_static(b"\x89PNG plaintext"))
    }

    async fn download_encrypted(&self, auth: &Credential, item_id: &ItemId) -> AppResult<Bytes> {
        self.record(auth, format!("download_encrypted:{item_id}"))?;
        self.server(|s| {
            if !s.items.iter().any(|i| &i.id == item_id) {
                return Err(AppError::not_found("Encrypted image not found"));
            }
            Ok(Bytes::from_static(b"II*\x00 ciphertext"))
        })
    }
}

impl FakeRepository {
    fn set_starred(&self, item_id: &ItemId, starred: bool) -> AppResult<()> {
        self.server(|s| {
            let item = s
                .items
                .iter_mut()
                .find(|i| &i.id == item_id)
                .ok_or_else(|| AppError::not_found("Item not found"))?;
            item.starred = starred;
            Ok(())
        })
    }
}

/// A fixed timestamp offset by `minutes`.
pub fn timestamp(minutes: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(12, minutes % 60, 0))
        .expect("valid timestamp")
}

/// An item as the server lists it, with suffixed names.
pub fn item(id: &str, folder: Option<&str>) -> Item {
    Item {
        id: ItemId::from(id),
        name: format!("{id}_encrypted_preview"),
        preview_path: format!("/api/preview/{id}_encrypted_preview"),
        starred: false,
        last_modified: timestamp(0),
        parent_id: folder.map(FolderId::from),
    }
}

/// A folder.
pub fn folder(id: &str, name: &str, parent: Option<&str>) -> Folder {
    Folder {
        id: FolderId::from(id),
        name: name.to_string(),
        parent_id: parent.map(FolderId::from),
        created_at: timestamp(0),
    }
}

/// A small PNG-named upload payload.
pub fn png(name: &str) -> UploadFile {
    UploadFile::new(format!("{name}.png"), vec![0x89, b'P', b'N', b'G'])
}

/// Test application context.
pub struct TestApp {
    /// The fake collaborator.
    pub repo: Arc<FakeRepository>,
    /// The view model under test.
    pub vm: ViewModel<FakeRepository>,
}

impl TestApp {
    /// A signed-in view model over the given server contents.
    pub fn new(items: Vec<Item>, folders: Vec<Folder>) -> Self {
        let repo = Arc::new(FakeRepository::with(items, folders));
        let credential = Credential::new(TOKEN).expect("credential");
        let vm = ViewModel::with_credential(repo.clone(), &ClientConfig::default(), Some(credential));
        Self { repo, vm }
    }

    /// A view model without a credential.
    pub fn signed_out(items: Vec<Item>) -> Self {
        let repo = Arc::new(FakeRepository::with(items, Vec::new()));
        let vm = ViewModel::with_credential(repo.clone(), &ClientConfig::default(), None);
        Self { repo, vm }
    }

    /// Loads folders and the active view, then forgets the recorded calls.
    pub async fn loaded(items: Vec<Item>, folders: Vec<Folder>) -> Self {
        let app = Self::new(items, folders);
        app.vm.refresh().await.expect("initial refresh");
        app.repo.reset_calls();
        app
    }

    /// Ids of the cached items.
    pub async fn item_ids(&self) -> Vec<String> {
        self.vm
            .snapshot()
            .await
            .items
            .into_iter()
            .map(|i| i.id.into_string())
            .collect()
    }

    /// Selected ids.
    pub async fn selected(&self) -> Vec<String> {
        self.vm
            .snapshot()
            .await
            .selected
            .into_iter()
            .map(|i| i.into_string())
            .collect()
    }
}

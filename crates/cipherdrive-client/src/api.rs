//! Collaborator trait for the repository server.

use async_trait::async_trait;
use bytes::Bytes;

use cipherdrive_core::result::AppResult;
use cipherdrive_core::types::{FolderId, ItemId};
use cipherdrive_entity::folder::Folder;
use cipherdrive_entity::item::Item;
use cipherdrive_entity::share::ShareRequest;
use cipherdrive_entity::upload::{DisclosedKey, UploadFile, UploadReceipt};

use crate::credential::Credential;
use crate::scope::FetchScope;

/// Logical operations the view model needs from the server.
///
/// Implementations must fail explicitly (return an error) rather than hang;
/// the view model applies no timeouts of its own. The credential is passed
/// into every call so no implementation reads ambient state.
#[async_trait]
pub trait RepositoryApi: Send + Sync + 'static {
    /// List the items of one collection, in server order.
    async fn fetch_items(&self, auth: &Credential, scope: &FetchScope) -> AppResult<Vec<Item>>;

    /// List every folder of the user, in server order.
    async fn fetch_folders(&self, auth: &Credential) -> AppResult<Vec<Folder>>;

    /// Create a folder, optionally under a parent.
    async fn create_folder(
        &self,
        auth: &Credential,
        name: &str,
        parent_id: Option<&FolderId>,
    ) -> AppResult<Folder>;

    /// Delete a folder. Removing its contents is the server's business.
    async fn delete_folder(&self, auth: &Credential, folder_id: &FolderId) -> AppResult<()>;

    /// Star an item.
    async fn star_item(&self, auth: &Credential, item_id: &ItemId) -> AppResult<()>;

    /// Remove the star from an item.
    async fn unstar_item(&self, auth: &Credential, item_id: &ItemId) -> AppResult<()>;

    /// Delete an item and all of its stored artifacts.
    async fn delete_item(&self, auth: &Credential, item_id: &ItemId) -> AppResult<()>;

    /// Move an item into a folder, or back to the root when `folder_id` is None.
    async fn move_item(
        &self,
        auth: &Credential,
        item_id: &ItemId,
        folder_id: Option<&FolderId>,
    ) -> AppResult<()>;

    /// Share items with another account.
    async fn share_items(&self, auth: &Credential, request: &ShareRequest) -> AppResult<()>;

    /// Upload and encrypt a file, returning the new item and its one-time key.
    async fn upload_file(&self, auth: &Credential, file: &UploadFile) -> AppResult<UploadReceipt>;

    /// Decrypt an item with its key and return the plaintext image bytes.
    async fn decrypt_item(
        &self,
        auth: &Credential,
        item_id: &ItemId,
        key: &DisclosedKey,
    ) -> AppResult<Bytes>;

    /// Fetch the stored encrypted image of an item.
    async fn download_encrypted(&self, auth: &Credential, item_id: &ItemId) -> AppResult<Bytes>;
}

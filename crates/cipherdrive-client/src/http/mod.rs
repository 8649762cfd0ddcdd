//! `reqwest`-backed implementation of [`RepositoryApi`].

pub mod status;
pub mod wire;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info};

use cipherdrive_core::config::ApiConfig;
use cipherdrive_core::error::{AppError, ErrorKind};
use cipherdrive_core::result::AppResult;
use cipherdrive_core::types::{FolderId, ItemId};
use cipherdrive_entity::folder::Folder;
use cipherdrive_entity::item::{Item, normalize_item_name};
use cipherdrive_entity::share::ShareRequest;
use cipherdrive_entity::upload::{DisclosedKey, UploadFile, UploadReceipt};

use crate::api::RepositoryApi;
use crate::credential::Credential;
use crate::scope::FetchScope;

use self::status::{error_from_status, error_from_transport};
use self::wire::{EncryptResponse, TokenResponse};

/// HTTP client for the encrypted image repository server.
#[derive(Debug, Clone)]
pub struct HttpRepositoryClient {
    /// Shared connection pool.
    client: Client,
    /// Endpoint configuration.
    config: ApiConfig,
    /// How many items the recent collection returns.
    recent_limit: u32,
}

impl HttpRepositoryClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig, recent_limit: u32) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| error_from_transport(e, "Build HTTP client"))?;

        Ok(Self {
            client,
            config: config.clone(),
            recent_limit,
        })
    }

    /// Exchange an email and password for a bearer credential.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Credential> {
        let request = self
            .client
            .post(self.config.url("/api/auth/login"))
            .form(&[("username", email), ("password", password)]);

        let response = send(request, "Sign in").await?;
        let token: TokenResponse = decode_json(response, "Sign in").await?;

        info!(email = %email, "Signed in");
        Credential::new(token.access_token)
            .map_err(|_| AppError::server("Sign in returned an empty token"))
    }

    fn get(&self, path: &str, auth: &Credential) -> RequestBuilder {
        self.client
            .get(self.config.url(path))
            .bearer_auth(auth.bearer())
    }

    fn post(&self, path: &str, auth: &Credential) -> RequestBuilder {
        self.client
            .post(self.config.url(path))
            .bearer_auth(auth.bearer())
    }

    fn delete(&self, path: &str, auth: &Credential) -> RequestBuilder {
        self.client
            .delete(self.config.url(path))
            .bearer_auth(auth.bearer())
    }

    fn items_request(&self, auth: &Credential, scope: &FetchScope) -> RequestBuilder {
        match scope {
            FetchScope::All => self.get("/api/items", auth),
            FetchScope::Starred => self.get("/api/items/starred", auth),
            FetchScope::Recent => self
                .get("/api/items/recent", auth)
                .query(&[("limit", self.recent_limit)]),
            FetchScope::Shared => self.get("/api/items/shared", auth),
            FetchScope::Folder { folder_id } => self
                .get("/api/items", auth)
                .query(&[("folder", folder_id.as_str())]),
            FetchScope::Search { query, folder_id } => {
                let mut params = vec![("query", query.as_str())];
                if let Some(folder_id) = folder_id {
                    params.push(("folder", folder_id.as_str()));
                }
                self.get("/api/search", auth).query(&params)
            }
        }
    }
}

#[async_trait]
impl RepositoryApi for HttpRepositoryClient {
    async fn fetch_items(&self, auth: &Credential, scope: &FetchScope) -> AppResult<Vec<Item>> {
        let response = send(self.items_request(auth, scope), "List items").await?;
        let items: Vec<Item> = decode_json(response, "List items").await?;
        debug!(scope = %scope, count = items.len(), "Fetched items");
        Ok(items)
    }

    async fn fetch_folders(&self, auth: &Credential) -> AppResult<Vec<Folder>> {
        let response = send(self.get("/api/folders", auth), "List folders").await?;
        let folders: Vec<Folder> = decode_json(response, "List folders").await?;
        debug!(count = folders.len(), "Fetched folders");
        Ok(folders)
    }

    async fn create_folder(
        &self,
        auth: &Credential,
        name: &str,
        parent_id: Option<&FolderId>,
    ) -> AppResult<Folder> {
        let mut fields = vec![("name", name)];
        if let Some(parent_id) = parent_id {
            fields.push(("parent_folder", parent_id.as_str()));
        }
        let request = self.post("/api/folders", auth).form(&fields);
        let response = send(request, "Create folder").await?;
        decode_json(response, "Create folder").await
    }

    async fn delete_folder(&self, auth: &Credential, folder_id: &FolderId) -> AppResult<()> {
        let path = format!("/api/folders/{folder_id}");
        send(self.delete(&path, auth), "Delete folder").await?;
        Ok(())
    }

    async fn star_item(&self, auth: &Credential, item_id: &ItemId) -> AppResult<()> {
        let path = format!("/api/items/{item_id}/star");
        send(self.post(&path, auth), "Star item").await?;
        Ok(())
    }

    async fn unstar_item(&self, auth: &Credential, item_id: &ItemId) -> AppResult<()> {
        let path = format!("/api/items/{item_id}/unstar");
        send(self.post(&path, auth), "Unstar item").await?;
        Ok(())
    }

    async fn delete_item(&self, auth: &Credential, item_id: &ItemId) -> AppResult<()> {
        let path = format!("/api/delete/{}", normalize_item_name(item_id.as_str()));
        send(self.delete(&path, auth), "Delete item").await?;
        Ok(())
    }

    async fn move_item(
        &self,
        auth: &Credential,
        item_id: &ItemId,
        folder_id: Option<&FolderId>,
    ) -> AppResult<()> {
        let path = format!("/api/items/{item_id}/move");
        let fields: Vec<(&str, &str)> = folder_id
            .map(|id| vec![("folder_id", id.as_str())])
            .unwrap_or_default();
        send(self.post(&path, auth).form(&fields), "Move item").await?;
        Ok(())
    }

    async fn share_items(&self, auth: &Credential, request: &ShareRequest) -> AppResult<()> {
        send(self.post("/api/share", auth).json(request), "Share items").await?;
        Ok(())
    }

    async fn upload_file(&self, auth: &Credential, file: &UploadFile) -> AppResult<UploadReceipt> {
        let mime = mime_guess::from_path(&file.name).first_or_octet_stream();
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.name.clone())
            .mime_str(mime.essence_str())
            .map_err(|e| error_from_transport(e, "Upload"))?;
        let form = Form::new().part("file", part);

        let response = send(self.post("/api/encrypt", auth).multipart(form), "Upload").await?;
        let body: EncryptResponse = decode_json(response, "Upload").await?;

        if body.preview_id.trim().is_empty() {
            return Err(AppError::server("Upload returned no item id"));
        }
        let key = DisclosedKey::new(body.encryption_key)?;

        info!(file = %file.name, item_id = %body.preview_id, "File encrypted");
        Ok(UploadReceipt {
            item_id: ItemId::new(body.preview_id),
            key,
        })
    }

    async fn decrypt_item(
        &self,
        auth: &Credential,
        item_id: &ItemId,
        key: &DisclosedKey,
    ) -> AppResult<Bytes> {
        let filename = normalize_item_name(item_id.as_str());
        let request = self
            .post("/api/decrypt", auth)
            .form(&[("filename", filename.as_str()), ("key", key.expose())]);

        let response = send(request, "Decrypt").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| error_from_transport(e, "Decrypt"))?;

        if bytes.is_empty() {
            return Err(AppError::server("Decrypt returned an empty image"));
        }
        debug!(item_id = %item_id, size = bytes.len(), "Item decrypted");
        Ok(bytes)
    }

    async fn download_encrypted(&self, auth: &Credential, item_id: &ItemId) -> AppResult<Bytes> {
        let response = send(self.get(&encrypted_path(item_id), auth), "Download").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| error_from_transport(e, "Download"))?;

        if bytes.is_empty() {
            return Err(AppError::server("Download returned an empty file"));
        }
        debug!(item_id = %item_id, size = bytes.len(), "Encrypted image downloaded");
        Ok(bytes)
    }
}

/// Storage path of an item's encrypted artifact.
fn encrypted_path(item_id: &ItemId) -> String {
    format!(
        "/storage/encrypted_view/{}_encrypted.tiff",
        normalize_item_name(item_id.as_str())
    )
}

/// Send a request and turn non-success statuses into errors.
async fn send(request: RequestBuilder, action: &str) -> AppResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| error_from_transport(e, action))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_from_status(status, &body, action))
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
    action: &str,
) -> AppResult<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| error_from_transport(e, action))?;
    serde_json::from_slice(&body).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("{action} returned an unexpected body: {e}"),
            e,
        )
    })
}

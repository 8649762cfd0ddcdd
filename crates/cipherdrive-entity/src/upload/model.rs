//! Upload payloads and results.

use bytes::Bytes;

use cipherdrive_core::types::ItemId;

use super::key::DisclosedKey;

/// A file submitted for encryption: a name and opaque bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    /// Original file name, including extension.
    pub name: String,
    /// File content.
    pub data: Bytes,
}

impl UploadFile {
    /// Create an upload payload.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Payload size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// What the server returns for a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    /// Identifier of the newly created item.
    pub item_id: ItemId,
    /// The one-time key; the server never returns it again.
    pub key: DisclosedKey,
}

//! Upload acceptance configuration.

use serde::{Deserialize, Serialize};

/// Limits applied to files before they are submitted for encryption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Required MIME type prefix (the server only encrypts images).
    #[serde(default = "default_accept_prefix")]
    pub accept_mime_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            accept_mime_prefix: default_accept_prefix(),
        }
    }
}

fn default_max_file_size() -> u64 {
    50 * 1024 * 1024
}

fn default_accept_prefix() -> String {
    "image/".to_string()
}

//! Response bodies that do not map directly onto entities.

use serde::Deserialize;

/// Body returned by `POST /api/encrypt`.
#[derive(Debug, Clone, Deserialize)]
pub struct EncryptResponse {
    /// The one-time key, rendered as a tuple.
    pub encryption_key: String,
    /// Id under which the new item is listed.
    pub preview_id: String,
}

/// Body returned by `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub access_token: String,
    /// Token type, always `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
}

//! Server endpoint configuration.

use serde::{Deserialize, Serialize};

/// Where and how the client reaches the repository server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the server, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// TCP connect timeout in seconds. Requests themselves are not timed out.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    /// Join an API path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_seconds: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("cipherdrive/{}", env!("CARGO_PKG_VERSION"))
}

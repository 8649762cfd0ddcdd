//! Credential configuration.

use serde::{Deserialize, Serialize};

/// Bearer credential supplied by the auth collaborator.
///
/// The token is never read ad hoc from ambient storage; it is loaded here
/// and passed explicitly into the view model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token, if the user has signed in.
    #[serde(default)]
    pub token: Option<String>,
}

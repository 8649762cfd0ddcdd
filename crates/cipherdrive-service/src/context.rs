//! Session context carrying the bearer credential.

use cipherdrive_client::Credential;
use cipherdrive_core::{AppError, AppResult};

/// Who is acting. Passed explicitly into every collaborator call; the
/// view model never reads a credential from ambient storage.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// The credential supplied by the auth collaborator.
    credential: Option<Credential>,
}

impl SessionContext {
    /// Creates a session context.
    pub fn new(credential: Option<Credential>) -> Self {
        Self { credential }
    }

    /// Returns the credential, or `AuthMissing` when signed out.
    pub fn require(&self) -> AppResult<&Credential> {
        self.credential.as_ref().ok_or_else(AppError::auth_missing)
    }

    /// Replaces the credential. Returns whether it changed.
    pub fn replace(&mut self, credential: Option<Credential>) -> bool {
        if self.credential == credential {
            return false;
        }
        self.credential = credential;
        true
    }

    /// Returns whether a credential is present.
    pub fn is_signed_in(&self) -> bool {
        self.credential.is_some()
    }
}

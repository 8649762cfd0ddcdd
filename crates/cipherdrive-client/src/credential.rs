//! Bearer credential supplied by the auth collaborator.

use std::fmt;

use cipherdrive_core::error::AppError;

/// An opaque bearer token.
///
/// Absence of a credential means no data operation may be attempted; the
/// view model holds an `Option<Credential>` and checks it before every call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a bearer token, rejecting blank input.
    pub fn new(token: impl Into<String>) -> Result<Self, AppError> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::auth_missing());
        }
        Ok(Self(token.to_string()))
    }

    /// Build a credential from optional configuration, treating blank as absent.
    pub fn from_optional(token: Option<&str>) -> Option<Self> {
        token.and_then(|t| Self::new(t).ok())
    }

    /// The raw token for the `Authorization` header.
    pub fn bearer(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

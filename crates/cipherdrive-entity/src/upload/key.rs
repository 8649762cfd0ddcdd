//! One-time decryption keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use cipherdrive_core::error::AppError;

/// Number of numeric components in a key tuple.
const KEY_COMPONENTS: usize = 5;

/// A decryption key as disclosed by the server after an upload.
///
/// The server renders the key as a tuple of five numbers, for example
/// `(0.41, 3.9, 0.02, 1.7, 0.66)`. Keys entered by the user are validated
/// against that shape before a decrypt request is sent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisclosedKey(String);

impl DisclosedKey {
    /// Wrap a key returned by the server, rejecting an empty one.
    pub fn new(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AppError::validation("The server returned an empty key"));
        }
        Ok(Self(raw))
    }

    /// Parse a key entered by the user.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Please enter a decryption key"));
        }

        // One pair of parentheses, or none at all.
        let inner = match (trimmed.strip_prefix('('), trimmed.strip_suffix(')')) {
            (Some(rest), Some(_)) => rest.strip_suffix(')').unwrap_or(rest),
            (None, None) => trimmed,
            _ => return Err(AppError::validation("Unbalanced parentheses in the key")),
        };
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != KEY_COMPONENTS {
            return Err(AppError::validation(format!(
                "A key has {KEY_COMPONENTS} comma-separated numbers, got {}",
                parts.len()
            )));
        }
        let is_number = |p: &&str| p.parse::<f64>().is_ok_and(f64::is_finite);
        if let Some(bad) = parts.iter().find(|p| !is_number(p)) {
            return Err(AppError::validation(format!(
                "'{bad}' is not a number in the key"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the key text.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DisclosedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DisclosedKey(***)")
    }
}

//! Share request value objects.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use cipherdrive_core::error::AppError;
use cipherdrive_core::types::ItemId;

/// A validated recipient email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipient(String);

impl Recipient {
    /// Validate and wrap a recipient address.
    pub fn parse(email: &str) -> Result<Self, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::validation("Please enter an email address"));
        }
        let email = email.to_string();
        if !email.validate_email() {
            return Err(AppError::validation(format!(
                "'{email}' is not a valid email address"
            )));
        }
        Ok(Self(email))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Body of a share call: which items, with whom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Items to share.
    #[serde(rename = "image_ids")]
    pub item_ids: Vec<ItemId>,
    /// Recipient account email.
    pub email: Recipient,
}

impl ShareRequest {
    /// Create a share request, rejecting an empty item list.
    pub fn new(item_ids: Vec<ItemId>, email: Recipient) -> Result<Self, AppError> {
        if item_ids.is_empty() {
            return Err(AppError::validation("Select at least one image to share"));
        }
        Ok(Self { item_ids, email })
    }
}

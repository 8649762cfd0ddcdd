//! Upload and key-disclosure value objects.

pub mod key;
pub mod model;

pub use key::DisclosedKey;
pub use model::{UploadFile, UploadReceipt};

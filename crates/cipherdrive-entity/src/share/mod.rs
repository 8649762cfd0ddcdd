//! Share domain entities.

pub mod request;

pub use request::{Recipient, ShareRequest};

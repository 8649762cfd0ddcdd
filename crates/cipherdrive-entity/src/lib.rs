//! # cipherdrive-entity
//!
//! Domain entity models for the CipherDrive client. Every struct in this
//! crate is either a record the server returns (items, folders) or a value
//! object the client sends (uploads, shares, decryption keys). Server
//! records derive `Serialize`/`Deserialize` against the server's field
//! names.

pub mod folder;
pub mod item;
pub mod share;
pub mod upload;

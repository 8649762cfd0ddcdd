//! Core type definitions used across the CipherDrive workspace.

pub mod id;

pub use id::*;

//! # cipherdrive-cli
//!
//! Command-line surface of the CipherDrive client. Every command builds a
//! [`ViewModel`](cipherdrive_service::ViewModel) over the HTTP
//! collaborator, drives it the way the browser front end would, and prints
//! the resulting snapshot as a table or as JSON.

pub mod commands;
pub mod output;

pub use commands::Cli;

//! # cipherdrive-service
//!
//! The content view model of the CipherDrive client. It reconstructs the
//! folder hierarchy, resolves the active view into fetch requests, keeps
//! the multi-item selection consistent across reloads and sequences the
//! upload flow so every one-time key is disclosed and acknowledged in
//! order.
//!
//! The server is reached only through the
//! [`RepositoryApi`](cipherdrive_client::RepositoryApi) collaborator,
//! injected at construction time via an `Arc`.

pub mod context;
pub mod folder;
pub mod model;
pub mod selection;
pub mod upload;
pub mod view;

pub use context::SessionContext;
pub use folder::{ExpandedFolders, build_tree};
pub use model::{Control, RefetchPlan, ViewEvent, ViewModel, ViewSnapshot};
pub use selection::{BulkOutcome, SelectionSet};
pub use upload::{BatchSummary, UploadSequencer};
pub use view::{ContentView, FetchDescriptor, resolve};

//! # cipherdrive-client
//!
//! The collaborator boundary of the CipherDrive client: the
//! [`RepositoryApi`] trait the view model depends on, the bearer
//! [`Credential`] passed explicitly into every call, and the `reqwest`
//! implementation that talks to the repository server.

pub mod api;
pub mod credential;
pub mod http;
pub mod scope;

pub use api::RepositoryApi;
pub use credential::Credential;
pub use http::HttpRepositoryClient;
pub use scope::FetchScope;

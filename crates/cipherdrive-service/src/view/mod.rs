//! Content views and their resolution into fetch requests.

pub mod content;
pub mod resolver;

pub use content::ContentView;
pub use resolver::{FetchDescriptor, resolve};

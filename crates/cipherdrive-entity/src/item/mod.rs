//! Encrypted item entities.

pub mod model;
pub mod name;

pub use model::Item;
pub use name::normalize_item_name;

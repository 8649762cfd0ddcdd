//! Orchestration of the content view.

pub mod busy;
pub mod event;
pub mod state;
pub mod view_model;

pub use busy::{BusyControls, Control};
pub use event::{RefetchPlan, ViewEvent};
pub use state::{FoldersTicket, ItemsTicket, KeyDisclosure, ViewSnapshot};
pub use view_model::ViewModel;

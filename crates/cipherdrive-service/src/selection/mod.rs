//! Item selection and bulk-action bookkeeping.

pub mod bulk;
pub mod set;

pub use bulk::BulkOutcome;
pub use set::SelectionSet;

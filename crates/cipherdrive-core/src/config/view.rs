//! Content view configuration.

use serde::{Deserialize, Serialize};

/// View shown when the client starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultView {
    /// Every item.
    #[default]
    All,
    /// Starred items.
    Starred,
    /// Recently modified items.
    Recent,
    /// Items shared with the user.
    Shared,
}

/// Settings for the content view model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// How many items the recent collection returns.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
    /// Initial view.
    #[serde(default)]
    pub default_view: DefaultView,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            default_view: DefaultView::default(),
        }
    }
}

fn default_recent_limit() -> u32 {
    5
}

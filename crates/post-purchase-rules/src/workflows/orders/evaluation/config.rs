use super::super::domain::{EditWindow, Industry};
use serde::{Deserialize, Serialize};

/// Knobs that shape the rule book. Fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Window applied when no specific edit-window rule matches.
    pub default_window: EditWindow,
    /// Appends the conservative risk rules to the address and lock groups.
    pub conservative: bool,
    pub enable_upsell: bool,
    /// Category signal used for rows that do not carry their own `industry`.
    pub default_industry: Option<Industry>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            default_window: EditWindow::Fifteen,
            conservative: false,
            enable_upsell: true,
            default_industry: None,
        }
    }
}

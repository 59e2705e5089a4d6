//! `[autocomplete]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [autocomplete]
//! min_chars = 3       # Shorter (trimmed) input never queries
//! debounce_ms = 500   # Quiet period after the last keystroke
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Suggestion query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Minimum trimmed query length before suggestions are requested.
    pub min_chars: usize,

    /// Debounce interval in milliseconds.
    pub debounce_ms: u64,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            min_chars: 3,
            debounce_ms: 500,
        }
    }
}

impl AutocompleteConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.min_chars == 0 {
            diag.error(FieldPath::new("autocomplete.min_chars"), "must be at least 1");
        }
    }
}

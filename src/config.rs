//! Controller configuration.
//!
//! Every knob is an explicit, typed, documented field with a sensible
//! default. There is no dynamic option bag: unknown settings are a compile
//! error, invalid settings are caught by [`TypeaheadConfig::validate`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TypeaheadError, TypeaheadResult};

/// Default quiet period between the last keystroke and the remote fetch.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Configuration for a [`SearchController`](crate::SearchController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeaheadConfig {
    /// How long to wait after the last keystroke before fetching. A zero
    /// duration dispatches the fetch inside `submit_query` itself.
    #[serde(default = "default_debounce")]
    pub debounce: Duration,

    /// Maximum number of result items in a view. `0` means unlimited.
    #[serde(default)]
    pub limit: usize,

    /// Whether cached result sets are consulted. When disabled, every
    /// distinct query schedules a fetch and predictive filtering is off;
    /// completed fetches are still recorded so re-enabling is cheap.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Whether an empty (post-normalization) query triggers a fetch.
    /// Off by default: an empty query usually means "show nothing".
    #[serde(default)]
    pub fetch_empty_query: bool,

    /// Which selectable row is selected after each view rebuild: `0` or `1`
    /// (clamped to the number of visible items).
    #[serde(default)]
    pub auto_select_index: usize,
}

fn default_debounce() -> Duration {
    Duration::from_millis(DEFAULT_DEBOUNCE_MS)
}

const fn default_true() -> bool {
    true
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            debounce: default_debounce(),
            limit: 0,
            cache_enabled: true,
            fetch_empty_query: false,
            auto_select_index: 0,
        }
    }
}

impl TypeaheadConfig {
    /// Validate field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`TypeaheadError::InvalidConfig`] if `auto_select_index` is
    /// not `0` or `1`.
    pub fn validate(&self) -> TypeaheadResult<()> {
        if self.auto_select_index > 1 {
            return Err(TypeaheadError::InvalidConfig {
                field: "auto_select_index",
                value: self.auto_select_index.to_string(),
                reason: "must be 0 or 1".into(),
            });
        }
        Ok(())
    }
}

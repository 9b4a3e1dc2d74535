//! Engine configuration.
//!
//! Everything tunable lives in `WishConfig`, loadable from JSON with every
//! field optional. The boosted candidate is data here; nothing in the
//! sampler knows any particular name.

use crate::error::ConfigError;
use crate::roster::parse_roster;
use crate::types::{Candidate, MAX_HISTORY_LENGTH};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WishConfig {
    /// Base roster, in display order.
    pub roster: Vec<Candidate>,
    /// Candidate whose weight is doubled, if present in the roster.
    pub boosted_candidate: Option<Candidate>,
    /// Oldest history records beyond this count are dropped.
    pub max_history_length: usize,
    /// Quiet window before a history write goes to the store.
    pub persist_debounce_ms: u64,
    /// Delay before a stepped batch reveal shows the next name.
    pub reveal_step_delay_ms: u64,
    /// Lifetime of persisted values.
    pub history_ttl_days: u64,
}

impl Default for WishConfig {
    fn default() -> Self {
        Self {
            roster: Vec::new(),
            boosted_candidate: None,
            max_history_length: MAX_HISTORY_LENGTH,
            persist_debounce_ms: 100,
            reveal_step_delay_ms: 100,
            history_ttl_days: 365,
        }
    }
}

impl WishConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default config over a comma-separated roster string.
    pub fn with_roster_list(list: &str) -> Self {
        Self {
            roster: parse_roster(list),
            ..Self::default()
        }
    }

    pub fn boosted(mut self, name: impl Into<Candidate>) -> Self {
        self.boosted_candidate = Some(name.into());
        self
    }

    pub fn history_ttl(&self) -> Duration {
        Duration::from_secs(self.history_ttl_days.saturating_mul(24 * 60 * 60))
    }
}

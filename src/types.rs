//! Core data types shared by the sampler, ledger, statistics and reveal
//! state machine.

use serde::{Deserialize, Serialize};

/// A name eligible to be drawn. Opaque to the engine.
pub type Candidate = String;

/// Number of names produced by one batch ("ten-pull") draw.
pub const BATCH_SIZE: usize = 10;

/// Default cap on retained history records.
pub const MAX_HISTORY_LENGTH: usize = 100;

/// Name reported by `top_entry` when there is no history yet.
pub const NO_DATA_NAME: &str = "<no-data>";

/// One drawn name and the moment it was drawn.
///
/// Serialized as `{ "name": ..., "time": ... }`, the format the page has
/// always kept in its `historyList` cookie. `time` is a locale-formatted
/// string, not a machine timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub name: Candidate,
    pub time: String,
}

impl DrawRecord {
    pub fn new(name: impl Into<Candidate>, time: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time: time.into(),
        }
    }
}

/// Aggregate count for one distinct name in the ledger.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsEntry {
    pub name: Candidate,
    pub count: usize,
    /// `100 * count / ledger length`.
    pub percentage: f64,
}

/// Which kind of draw the session is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawMode {
    #[default]
    Idle,
    Single,
    Batch,
}

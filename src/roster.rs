//! Roster and weighting table.
//!
//! Weighting is done by duplication: the boosted candidate gets one extra
//! copy appended to the roster, so a uniform index draw picks it with
//! probability `2 / (N + 1)` and everyone else with `1 / (N + 1)`.

use crate::types::Candidate;

/// Split the page's comma-separated roster string into candidates.
///
/// Entries are trimmed and empty entries dropped. Duplicates are kept.
pub fn parse_roster(list: &str) -> Vec<Candidate> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// The expanded candidate sequence sampled by uniform index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedRoster {
    entries: Vec<Candidate>,
}

impl WeightedRoster {
    /// Build the weighted roster from `base`.
    ///
    /// If `boosted` appears in `base`, one more copy of it is appended.
    /// Otherwise `base` is used unchanged.
    pub fn build(base: &[Candidate], boosted: Option<&str>) -> Self {
        let mut entries = base.to_vec();
        if let Some(name) = boosted {
            if base.iter().any(|c| c == name) {
                entries.push(name.to_string());
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> &Candidate {
        &self.entries[index]
    }

    /// How many slots `name` occupies.
    pub fn weight_of(&self, name: &str) -> usize {
        self.entries.iter().filter(|c| c.as_str() == name).count()
    }
}

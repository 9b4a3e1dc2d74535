//! Weighted sampler: single and batch draws over a `WeightedRoster`.

use crate::error::WishError;
use crate::rng::DrawRng;
use crate::roster::WeightedRoster;
use crate::types::{Candidate, BATCH_SIZE};

/// Pick one candidate with a uniform index over the weighted roster.
pub fn draw_one(roster: &WeightedRoster, rng: &mut DrawRng) -> Result<Candidate, WishError> {
    if roster.is_empty() {
        return Err(WishError::InvalidRoster);
    }
    let index = rng.gen_index(roster.len());
    Ok(roster.get(index).clone())
}

/// Ten independent draws with replacement. The order is the reveal order.
pub fn draw_ten(roster: &WeightedRoster, rng: &mut DrawRng) -> Result<Vec<Candidate>, WishError> {
    (0..BATCH_SIZE).map(|_| draw_one(roster, rng)).collect()
}

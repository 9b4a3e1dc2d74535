//! Random number source for the sampler.
//!
//! Wraps `rand`'s `SmallRng` (xoshiro256++). This is not a fair-RNG for
//! anything security related; it only has to be uniform and fast. In the
//! browser, entropy comes from `getrandom` (crypto.getRandomValues).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A seedable RNG used for every draw.
///
/// Created from system entropy for real sessions, or seeded for
/// deterministic tests and replays.
pub struct DrawRng {
    inner: SmallRng,
}

impl DrawRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in [0, max).
    ///
    /// `max` must be non-zero; callers check for an empty roster first.
    #[inline(always)]
    pub fn gen_index(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }
}

impl Default for DrawRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_deterministic() {
        let mut rng1 = DrawRng::from_seed(42);
        let mut rng2 = DrawRng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(rng1.gen_index(1000), rng2.gen_index(1000));
        }
    }

    #[test]
    fn test_index_bounds() {
        let mut rng = DrawRng::from_seed(123);
        for _ in 0..1000 {
            assert!(rng.gen_index(7) < 7);
        }
    }

    #[test]
    fn test_single_slot_always_zero() {
        let mut rng = DrawRng::from_seed(9);
        for _ in 0..50 {
            assert_eq!(rng.gen_index(1), 0);
        }
    }
}

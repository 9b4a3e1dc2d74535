//! Time source for timers and record timestamps.

use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    /// Monotonic-enough milliseconds used for timer deadlines.
    fn now_ms(&self) -> u64;

    /// Human-readable timestamp stored in `DrawRecord::time`.
    fn timestamp(&self) -> String;
}

/// A clock that only moves when told to. Clones share the same time, so a
/// test (or a native host) can keep a handle while the engine owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn timestamp(&self) -> String {
        format!("t+{}ms", self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();
        handle.advance(250);
        assert_eq!(clock.now_ms(), 1_250);
        assert_eq!(clock.timestamp(), "t+1250ms");
    }
}

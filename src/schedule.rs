//! Single-slot cancellable timer.
//!
//! The engine has no background threads and no ambient timers. Anything that
//! "fires later" is a `ScheduledTask` holding a deadline in clock
//! milliseconds; the owner polls it with `take_due(now)` whenever the host
//! calls `tick`. Scheduling again replaces the pending deadline, which is
//! exactly debounce semantics.

#[derive(Clone, Debug)]
pub struct ScheduledTask<T> {
    pending: Option<(u64, T)>,
}

impl<T> Default for ScheduledTask<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> ScheduledTask<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at `due_at`, replacing anything pending.
    pub fn schedule(&mut self, due_at: u64, payload: T) {
        self.pending = Some((due_at, payload));
    }

    /// Drop the pending task, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn due_at(&self) -> Option<u64> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Remove and return the payload if its deadline is at or before `now`.
    pub fn take_due(&mut self, now: u64) -> Option<T> {
        if self.pending.as_ref().is_some_and(|(at, _)| *at <= now) {
            self.pending.take().map(|(_, payload)| payload)
        } else {
            None
        }
    }

    /// Remove and return the payload regardless of its deadline.
    pub fn take_now(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_due() {
        let mut task = ScheduledTask::new();
        task.schedule(100, "write");
        assert_eq!(task.take_due(99), None);
        assert_eq!(task.take_due(100), Some("write"));
        assert_eq!(task.due_at(), None);
    }

    #[test]
    fn test_reschedule_replaces_deadline() {
        let mut task = ScheduledTask::new();
        task.schedule(100, 1);
        task.schedule(150, 2);
        assert_eq!(task.due_at(), Some(150));
        assert_eq!(task.take_due(120), None);
        assert_eq!(task.take_due(150), Some(2));
        // Only one firing, the earlier one was replaced.
        assert_eq!(task.take_due(1_000), None);
    }

    #[test]
    fn test_cancel() {
        let mut task = ScheduledTask::new();
        assert!(!task.cancel());
        task.schedule(10, ());
        assert!(task.cancel());
        assert_eq!(task.take_due(u64::MAX), None);
    }

    #[test]
    fn test_take_now_ignores_deadline() {
        let mut task = ScheduledTask::new();
        task.schedule(500, 'x');
        assert_eq!(task.take_now(), Some('x'));
        assert_eq!(task.take_now(), None);
    }
}

//! History ledger: the capped, ordered log of every name drawn.
//!
//! Appends are in memory and immediate. Persistence is debounced: each
//! `request_persist` pushes the single pending write out to
//! `persist_debounce_ms` after the latest request, so a burst of draws costs
//! one store write. Store failures never reach the caller; the ledger keeps
//! working in memory.

use crate::config::WishConfig;
use crate::error::StoreError;
use crate::present::{Confirm, ConfirmPrompt};
use crate::schedule::ScheduledTask;
use crate::store::{HistoryStore, HISTORY_KEY};
use crate::types::DrawRecord;
use log::{debug, info, warn};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct HistoryLedger {
    records: Vec<DrawRecord>,
    max_len: usize,
    debounce_ms: u64,
    ttl: Duration,
    pending_write: ScheduledTask<()>,
}

impl HistoryLedger {
    /// Empty ledger using the limits from `config`.
    pub fn new(config: &WishConfig) -> Self {
        Self {
            records: Vec::new(),
            max_len: config.max_history_length,
            debounce_ms: config.persist_debounce_ms,
            ttl: config.history_ttl(),
            pending_write: ScheduledTask::new(),
        }
    }

    /// Load the persisted ledger. Missing, unreadable or malformed data all
    /// produce an empty ledger.
    pub fn load<S: HistoryStore>(store: &S, config: &WishConfig) -> Self {
        let mut ledger = Self::new(config);
        match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<DrawRecord>>(&raw) {
                Ok(records) => {
                    debug!("loaded {} history records", records.len());
                    ledger.records = records;
                    ledger.enforce_cap();
                }
                Err(e) => warn!("stored history is malformed, starting empty: {e}"),
            },
            Ok(None) => debug!("no stored history"),
            Err(e) => warn!("could not read stored history, starting empty: {e}"),
        }
        ledger
    }

    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append in order, evicting the oldest records beyond the cap.
    pub fn append<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = DrawRecord>,
    {
        self.records.extend(records);
        self.enforce_cap();
    }

    fn enforce_cap(&mut self) {
        if self.records.len() > self.max_len {
            let excess = self.records.len() - self.max_len;
            self.records.drain(..excess);
        }
    }

    /// (Re)schedule the debounced write relative to `now`.
    pub fn request_persist(&mut self, now: u64) {
        let due = now.saturating_add(self.debounce_ms);
        self.pending_write.schedule(due, ());
        debug!("history write scheduled for {due}");
    }

    /// Deadline of the pending write, if any.
    pub fn pending_write_at(&self) -> Option<u64> {
        self.pending_write.due_at()
    }

    /// Perform the pending write if its deadline has passed.
    pub fn flush_due<S: HistoryStore>(&mut self, now: u64, store: &mut S) -> bool {
        if self.pending_write.take_due(now).is_some() {
            self.persist(store);
            true
        } else {
            false
        }
    }

    /// Perform the pending write right away, ignoring the debounce window.
    pub fn flush<S: HistoryStore>(&mut self, store: &mut S) -> bool {
        if self.pending_write.take_now().is_some() {
            self.persist(store);
            true
        } else {
            false
        }
    }

    /// Serialize the whole ledger to the store. Best effort.
    pub fn persist<S: HistoryStore>(&self, store: &mut S) {
        let result = serde_json::to_string(&self.records)
            .map_err(StoreError::from)
            .and_then(|json| store.set(HISTORY_KEY, &json, self.ttl));
        match result {
            Ok(()) => debug!("persisted {} history records", self.records.len()),
            Err(e) => warn!("history write failed, keeping ledger in memory: {e}"),
        }
    }

    /// Drop any pending write. Returns whether one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending_write.cancel()
    }

    /// Wipe the ledger and its stored copy, if the user confirms.
    pub fn clear<S, K>(&mut self, confirm: &mut K, store: &mut S) -> bool
    where
        S: HistoryStore,
        K: Confirm + ?Sized,
    {
        if !confirm.confirm(ConfirmPrompt::ClearHistory) {
            debug!("history clear declined");
            return false;
        }
        // A pending write must not resurrect the old ledger after the wipe.
        self.cancel_pending();
        self.records.clear();
        if let Err(e) = store.delete(HISTORY_KEY) {
            warn!("could not delete stored history: {e}");
        }
        info!("history cleared");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreOp;
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    fn rec(i: usize) -> DrawRecord {
        DrawRecord::new(format!("n{i}"), format!("t{i}"))
    }

    fn config_with_cap(cap: usize) -> WishConfig {
        WishConfig {
            max_history_length: cap,
            ..WishConfig::default()
        }
    }

    /// Store whose writes and deletes always fail.
    #[derive(Default)]
    struct BrokenStore {
        inner: MemoryStore,
    }

    impl HistoryStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }
        fn set(&mut self, key: &str, _value: &str, _ttl: Duration) -> Result<(), StoreError> {
            Err(StoreError::backend(StoreOp::Set, key, "cookie too large"))
        }
        fn delete(&mut self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::backend(StoreOp::Delete, key, "blocked"))
        }
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut ledger = HistoryLedger::new(&config_with_cap(100));
        for i in 0..105 {
            ledger.append([rec(i)]);
        }
        assert_eq!(ledger.len(), 100);
        assert_eq!(ledger.records()[0], rec(5));
        assert_eq!(ledger.records()[99], rec(104));
    }

    #[test]
    fn test_batch_append_preserves_order() {
        let mut ledger = HistoryLedger::new(&config_with_cap(100));
        ledger.append((0..10).map(rec));
        let names: Vec<_> = ledger.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7", "n8", "n9"]);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = MemoryStore::new();
        assert!(HistoryLedger::load(&store, &WishConfig::default()).is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{not json", Duration::ZERO).unwrap();
        assert!(HistoryLedger::load(&store, &WishConfig::default()).is_empty());
    }

    #[test]
    fn test_load_applies_cap() {
        let mut store = MemoryStore::new();
        let stored: Vec<DrawRecord> = (0..8).map(rec).collect();
        store
            .set(HISTORY_KEY, &serde_json::to_string(&stored).unwrap(), Duration::ZERO)
            .unwrap();
        let ledger = HistoryLedger::load(&store, &config_with_cap(5));
        assert_eq!(ledger.records(), &stored[3..]);
    }

    #[test]
    fn test_debounce_collapses_burst() {
        let mut store = MemoryStore::new();
        let mut ledger = HistoryLedger::new(&WishConfig::default());

        ledger.append([rec(0)]);
        ledger.request_persist(0);
        ledger.append([rec(1)]);
        ledger.request_persist(50);
        ledger.append([rec(2)]);
        ledger.request_persist(90);

        // The window restarts at the last request.
        assert!(!ledger.flush_due(100, &mut store));
        assert!(!ledger.flush_due(189, &mut store));
        assert!(ledger.flush_due(190, &mut store));
        assert!(!ledger.flush_due(1_000, &mut store));

        assert_eq!(store.write_count(), 1);
        let saved: Vec<DrawRecord> =
            serde_json::from_str(&store.get(HISTORY_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(store.ttl(HISTORY_KEY), Some(WishConfig::default().history_ttl()));
    }

    #[test]
    fn test_flush_writes_immediately() {
        let mut store = MemoryStore::new();
        let mut ledger = HistoryLedger::new(&WishConfig::default());
        ledger.append([rec(0)]);
        assert!(!ledger.flush(&mut store));
        ledger.request_persist(0);
        assert!(ledger.flush(&mut store));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_write_failure_keeps_ledger() {
        let mut store = BrokenStore::default();
        let mut ledger = HistoryLedger::new(&WishConfig::default());
        ledger.append([rec(0)]);
        ledger.request_persist(0);
        assert!(ledger.flush_due(100, &mut store));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut store = MemoryStore::new();
        let mut ledger = HistoryLedger::new(&WishConfig::default());
        ledger.append([rec(0)]);
        ledger.persist(&mut store);

        let mut prompts = Vec::new();
        let mut decline = |p: ConfirmPrompt| {
            prompts.push(p);
            false
        };
        assert!(!ledger.clear(&mut decline, &mut store));
        assert_eq!(prompts, vec![ConfirmPrompt::ClearHistory]);
        assert_eq!(ledger.len(), 1);
        assert!(store.contains(HISTORY_KEY));
    }

    #[test]
    fn test_clear_cancels_pending_write() {
        let mut store = MemoryStore::new();
        let mut ledger = HistoryLedger::new(&WishConfig::default());
        ledger.append([rec(0), rec(1)]);
        ledger.request_persist(0);

        assert!(ledger.clear(&mut |_: ConfirmPrompt| true, &mut store));
        assert!(ledger.is_empty());
        assert_eq!(ledger.pending_write_at(), None);

        // The old timer must not fire and write anything back.
        assert!(!ledger.flush_due(10_000, &mut store));
        assert!(!store.contains(HISTORY_KEY));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_clear_survives_delete_failure() {
        let mut store = BrokenStore::default();
        let mut ledger = HistoryLedger::new(&WishConfig::default());
        ledger.append([rec(0)]);
        assert!(ledger.clear(&mut |_: ConfirmPrompt| true, &mut store));
        assert!(ledger.is_empty());
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_cap(
            cap in 0usize..40,
            batches in prop::collection::vec(0usize..15, 0..30),
        ) {
            let mut ledger = HistoryLedger::new(&config_with_cap(cap));
            let mut all = Vec::new();
            let mut next = 0;
            for size in batches {
                let batch: Vec<DrawRecord> = (next..next + size).map(rec).collect();
                next += size;
                all.extend(batch.iter().cloned());
                ledger.append(batch);
                prop_assert!(ledger.len() <= cap);
            }
            let keep = all.len().min(cap);
            prop_assert_eq!(ledger.records(), &all[all.len() - keep..]);
        }
    }
}

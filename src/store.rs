//! Key-value store contract used for persistence.
//!
//! In the browser this is the cookie jar; natively it is whatever the host
//! plugs in. The engine only ever stores strings.

use crate::error::StoreError;
use std::collections::HashMap;
use std::time::Duration;

/// Key holding the JSON-serialized history ledger.
pub const HISTORY_KEY: &str = "historyList";

pub trait HistoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store. Expiry is recorded but not enforced.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, (String, Duration)>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries.get(key).map(|(_, ttl)| *ttl)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl HistoryStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|(value, _)| value.clone()))
    }

    fn set(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.entries
            .insert(key.to_string(), (value.to_string(), ttl));
        self.writes += 1;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.ttl("k"), Some(Duration::from_secs(60)));
        store.delete("k").unwrap();
        assert!(!store.contains("k"));
        assert_eq!(store.write_count(), 1);
    }
}

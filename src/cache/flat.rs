//! Flat TTL cache for point lookups.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Generic key -> (value, insertion time) store with a fixed expiry.
///
/// Entries older than the TTL are treated as absent and evicted lazily on
/// the next access; there is no background sweeper. `clear` drops everything
/// at once.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entries: HashMap<String, (T, Instant)>,
}

impl<T: Clone> TtlCache<T> {
    /// Create an empty cache with the given entry lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Look up a key, evicting it first if it has expired.
    pub fn get(&mut self, key: &str) -> Option<T> {
        match self.entries.get(key) {
            Some((value, inserted)) if inserted.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or overwrite a value, resetting its insertion time.
    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), (value, Instant::now()));
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

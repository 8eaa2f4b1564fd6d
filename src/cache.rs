//! Expiring key-value cache
//!
//! Backs the answer cache and the extracted-content cache. Entries
//! live for a fixed TTL; an expired entry is dropped on lookup.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a key. Returns `None` for missing or expired entries;
    /// expired entries are removed.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock();
        let live = match entries.get(key) {
            Some((inserted, value)) if inserted.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => None,
            None => return None,
        };
        if live.is_none() {
            entries.remove(key);
        }
        live
    }

    /// Insert a value, resetting its expiry clock.
    pub fn insert(&self, key: K, value: V) {
        self.lock().insert(key, (Instant::now(), value));
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, (Instant, V)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Store implementation
//!
//! BTreeMap-based store with a single Mutex for all operations.

use std::collections::BTreeMap;

use parking_lot::Mutex;

/// Shared key-value store
///
/// Every operation takes the same lock, so compound updates seen by one
/// caller appear atomic to all others. Lock hold time is bounded by the
/// store size (`get_all` copies everything).
#[derive(Debug, Default)]
pub struct Store {
    entries: Mutex<BTreeMap<String, String>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry
    pub fn get_all(&self) -> BTreeMap<String, String> {
        self.entries.lock().clone()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    /// Insert or overwrite every pair under one lock acquisition
    ///
    /// `pairs` is drained while the lock is held and must not call back
    /// into the store.
    pub fn set_many<I>(&self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries = self.entries.lock();
        for (key, value) in pairs {
            entries.insert(key, value);
        }
    }

    /// Insert or overwrite a single pair
    pub fn set_one(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().insert(key.into(), value.into());
    }

    /// Delete a key, returning whether it was present
    pub fn delete(&self, key: &str) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

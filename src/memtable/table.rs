//! MemTable implementation
//!
//! BTreeMap-based memtable with RwLock for concurrency.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

/// In-memory ordered table
///
/// All methods take `&self`; the map is guarded by a `parking_lot::RwLock`
/// and the size counter is atomic, so one table can be shared by many threads.
pub struct MemTable {
    /// Sorted key → value map
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,

    /// Approximate size in bytes (sum of key and value lengths)
    size: AtomicUsize,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            size: AtomicUsize::new(0),
        }
    }

    /// Get a copy of the value stored under `key`
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.read().get(key).cloned()
    }

    /// Check whether `key` is present
    pub fn contains(&self, key: &[u8]) -> bool {
        self.data.read().contains_key(key)
    }

    /// Insert or overwrite, returning the previous value
    pub fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Option<Vec<u8>> {
        let key_len = key.len();
        let value_len = value.len();
        let mut data = self.data.write();

        let previous = data.insert(key, value);
        match &previous {
            Some(old) => {
                // Key bytes were already counted
                self.size.fetch_add(value_len, Ordering::Relaxed);
                self.size.fetch_sub(old.len(), Ordering::Relaxed);
            }
            None => {
                self.size.fetch_add(key_len + value_len, Ordering::Relaxed);
            }
        }
        previous
    }

    /// Remove `key`, returning its value if it was present
    pub fn remove(&self, key: &[u8]) -> Option<Vec<u8>> {
        let mut data = self.data.write();
        let removed = data.remove(key);
        if let Some(value) = &removed {
            self.size.fetch_sub(key.len() + value.len(), Ordering::Relaxed);
        }
        removed
    }

    /// Get approximate size in bytes
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check if the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Walk every entry in key order and return how many were visited
    pub fn scan_count(&self) -> usize {
        self.data.read().iter().count()
    }

    /// Snapshot of all entries in sorted key order
    pub fn entries(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Drop all entries
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.clear();
        self.size.store(0, Ordering::Relaxed);
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new()
    }
}

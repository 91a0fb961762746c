// src/core/database/core.rs

use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// `Db` is a flat string keyspace.
#[derive(Debug, Default)]
pub struct Db {
    entries: DashMap<Bytes, Bytes>,
}

impl Db {
    /// Creates a new, empty `Db` instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &Bytes) -> Option<Bytes> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn set(&self, key: Bytes, value: Bytes) -> Option<Bytes> {
        self.entries.insert(key, value)
    }

    /// Stores `value` only if `key` is absent. Returns true if it was stored.
    pub fn set_if_absent(&self, key: Bytes, value: Bytes) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Replaces the value only if `key` is present. Returns true if it was stored.
    pub fn set_if_present(&self, key: Bytes, value: Bytes) -> bool {
        match self.entries.get_mut(&key) {
            Some(mut existing) => {
                *existing = value;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, key: &Bytes) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &Bytes) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes every key, returning how many there were.
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Returns the total number of keys in the database.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Fake key-value storage, standing in for both local and session storage.

use std::cell::RefCell;

use indexmap::IndexMap;

/// Which browser storage a [`MemoryStorage`] plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Persistent per-origin storage.
    Local,
    /// Per-tab storage.
    Session,
}

/// A recorded call on a [`MemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    /// `get(key)`
    Get(String),
    /// `set(key, value)`
    Set(String, String),
    /// `remove(key)`
    Remove(String),
    /// `clear()`
    Clear,
    /// `key(index)`
    Key(usize),
}

/// String-to-string storage kept in insertion order.
///
/// Overwriting an existing key keeps its position; removing a key shifts the
/// ones after it down by one, so [`MemoryStorage::key`] always reflects the
/// current order.
#[derive(Debug)]
pub struct MemoryStorage {
    kind: StorageKind,
    entries: RefCell<IndexMap<String, String>>,
    calls: RefCell<Vec<StorageCall>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new(kind: StorageKind) -> Self {
        Self {
            kind,
            entries: RefCell::new(IndexMap::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Returns the role this storage plays.
    #[must_use]
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Returns the value stored under `key`, or `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.record(StorageCall::Get(key.to_string()));
        self.entries.borrow().get(key).cloned()
    }

    /// Inserts `value` under `key`, overwriting any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.record(StorageCall::Set(key.clone(), value.clone()));
        self.entries.borrow_mut().insert(key, value);
    }

    /// Removes the entry under `key`, if any.
    pub fn remove(&self, key: &str) {
        self.record(StorageCall::Remove(key.to_string()));
        self.entries.borrow_mut().shift_remove(key);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.record(StorageCall::Clear);
        self.entries.borrow_mut().clear();
    }

    /// Returns the key at position `index`, or `None` if out of range.
    pub fn key(&self, index: usize) -> Option<String> {
        self.record(StorageCall::Key(index));
        self.entries
            .borrow()
            .get_index(index)
            .map(|(key, _)| key.clone())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if the storage holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns the calls made since the last reset.
    #[must_use]
    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.borrow().clone()
    }

    /// Forgets the recorded calls, keeping the stored entries.
    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Empties the storage and forgets the recorded calls.
    pub fn restore(&self) {
        self.entries.borrow_mut().clear();
        self.reset_calls();
    }

    fn record(&self, call: StorageCall) {
        self.calls.borrow_mut().push(call);
    }
}

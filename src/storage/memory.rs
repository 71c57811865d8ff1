//! Page-scoped fallback store.

use super::{select_keys, StorageError};
use crate::traits::{KeyValueStore, Record};
use std::sync::Mutex;

/// A [`KeyValueStore`] that keeps everything in memory.
///
/// Used when the host store cannot be opened; contents are lost when the
/// process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `record`.
    pub fn with_record(record: Record) -> Self {
        Self {
            inner: Mutex::new(record),
        }
    }
}

impl KeyValueStore for MemoryStore {
    type Error = StorageError;

    fn get(&self, keys: &[&str]) -> Result<Record, StorageError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        Ok(select_keys(&inner, keys))
    }

    fn set(&self, record: Record) -> Result<(), StorageError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        inner.extend(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_replaces_only_given_keys() {
        let store = MemoryStore::new();
        let mut first = Record::new();
        first.insert("a".into(), json!(1));
        first.insert("b".into(), json!(2));
        store.set(first).unwrap();

        let mut second = Record::new();
        second.insert("a".into(), json!(10));
        store.set(second).unwrap();

        let got = store.get(&["a", "b"]).unwrap();
        assert_eq!(got.get("a"), Some(&json!(10)));
        assert_eq!(got.get("b"), Some(&json!(2)));
    }

    #[test]
    fn missing_keys_are_absent() {
        let store = MemoryStore::new();
        assert!(store.get(&["nothing"]).unwrap().is_empty());
    }
}

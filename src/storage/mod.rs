//! Persistence backends.
//!
//! This module provides concrete [`KeyValueStore`] implementations and the
//! [`Persistence`] adapter that picks one at runtime: the host store
//! ([`FileStore`], a JSON object on disk) when its location is usable, or
//! the page-scoped [`MemoryStore`] otherwise.  Both present the same
//! interface, so nothing above this module knows which one is active.
//!
//! [`DeferredWriter`] sits in front of whichever backend was chosen and owns
//! it on a background thread.

pub mod deferred;
pub mod file;
pub mod memory;

pub use deferred::DeferredWriter;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::StorageConfig;
use crate::traits::{KeyValueStore, Record};
use log::{info, warn};
use std::path::PathBuf;

/// Persisted key holding the [`CategorizedLinks`](crate::model::CategorizedLinks) map.
pub const KEY_CATEGORIZED_LINKS: &str = "categorizedLinks";

/// Persisted key holding the list of user-created categories.
pub const KEY_CUSTOM_CATEGORIES: &str = "customCategories";

/// Errors produced by the storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// The backend selected at startup.
pub enum Persistence {
    /// Host-provided durable store.
    Host(FileStore),
    /// Fallback that only lives as long as the process.
    Page(MemoryStore),
}

impl Persistence {
    /// Open the host store described by `config`, falling back to memory
    /// when it is unusable and `fallback_to_memory` is set.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        match FileStore::open(&config.path) {
            Ok(store) => {
                info!("using host store at {}", config.path.display());
                Ok(Persistence::Host(store))
            }
            Err(e) if config.fallback_to_memory => {
                warn!("host store unavailable ({}), falling back to memory", e);
                Ok(Persistence::Page(MemoryStore::new()))
            }
            Err(e) => Err(e),
        }
    }

    /// Short backend label for logs.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Persistence::Host(_) => "host",
            Persistence::Page(_) => "page",
        }
    }
}

impl KeyValueStore for Persistence {
    type Error = StorageError;

    fn get(&self, keys: &[&str]) -> Result<Record, StorageError> {
        match self {
            Persistence::Host(store) => store.get(keys),
            Persistence::Page(store) => store.get(keys),
        }
    }

    fn set(&self, record: Record) -> Result<(), StorageError> {
        match self {
            Persistence::Host(store) => store.set(record),
            Persistence::Page(store) => store.set(record),
        }
    }
}

/// Keep only the entries of `all` whose key is listed in `keys`.
pub(crate) fn select_keys(all: &Record, keys: &[&str]) -> Record {
    keys.iter()
        .filter_map(|k| all.get(*k).map(|v| (k.to_string(), v.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_uses_host_store_when_writable() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            path: dir.path().join("store.json"),
            fallback_to_memory: true,
        };
        let p = Persistence::open(&config).unwrap();
        assert_eq!(p.backend_name(), "host");
    }

    #[test]
    fn open_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected makes the path unusable.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let config = StorageConfig {
            path: blocker.join("store.json"),
            fallback_to_memory: true,
        };
        let p = Persistence::open(&config).unwrap();
        assert_eq!(p.backend_name(), "page");
    }

    #[test]
    fn open_without_fallback_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let config = StorageConfig {
            path: blocker.join("store.json"),
            fallback_to_memory: false,
        };
        assert!(Persistence::open(&config).is_err());
    }

    #[test]
    fn both_backends_share_the_same_interface() {
        let dir = tempfile::tempdir().unwrap();
        let backends = vec![
            Persistence::Host(FileStore::open(dir.path().join("s.json")).unwrap()),
            Persistence::Page(MemoryStore::new()),
        ];
        for backend in backends {
            let mut rec = Record::new();
            rec.insert(KEY_CUSTOM_CATEGORIES.into(), json!([]));
            backend.set(rec).unwrap();
            let got = backend
                .get(&[KEY_CUSTOM_CATEGORIES, KEY_CATEGORIZED_LINKS])
                .unwrap();
            assert_eq!(got.get(KEY_CUSTOM_CATEGORIES), Some(&json!([])));
            assert!(got.get(KEY_CATEGORIZED_LINKS).is_none());
        }
    }

    #[test]
    fn select_keys_filters() {
        let mut all = Record::new();
        all.insert("a".into(), json!(1));
        all.insert("b".into(), json!(2));
        let picked = select_keys(&all, &["b", "c"]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked.get("b"), Some(&json!(2)));
    }
}

//! Host key-value store backed by a single JSON object file.
//!
//! Every write reads the current object, replaces the given keys, and
//! rewrites the whole file through a temp file + rename so a crash never
//! leaves a half-written store behind.

use super::{select_keys, StorageError};
use crate::traits::{KeyValueStore, Record};
use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A [`KeyValueStore`] persisted as one JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (and create if needed) the store at `path`.
    ///
    /// Fails when the parent directory cannot be created or the file cannot
    /// be opened for writing.  An existing file is not parsed here; a corrupt
    /// file surfaces as an error from [`get`](KeyValueStore::get) instead.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
            }
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// The filesystem path of the store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Record, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Record::new()),
            Err(e) => return Err(io_err(&self.path, e)),
        };
        if contents.trim().is_empty() {
            return Ok(Record::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, record: &Record) -> Result<(), StorageError> {
        let serialized = serde_json::to_string_pretty(record)?;
        let temp_path = self
            .path
            .with_extension(format!("json.{}.tmp", std::process::id()));
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| io_err(&temp_path, e))?;
            file.write_all(serialized.as_bytes())
                .map_err(|e| io_err(&temp_path, e))?;
            file.sync_all().map_err(|e| io_err(&temp_path, e))?;
        }
        fs::rename(&temp_path, &self.path).map_err(|e| io_err(&self.path, e))?;
        debug!("wrote {}", self.path.display());
        Ok(())
    }
}

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    type Error = StorageError;

    fn get(&self, keys: &[&str]) -> Result<Record, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StorageError::Unavailable("file store lock poisoned".into()))?;
        let all = self.read_all()?;
        Ok(select_keys(&all, keys))
    }

    fn set(&self, record: Record) -> Result<(), StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StorageError::Unavailable("file store lock poisoned".into()))?;
        // Writes are full-value replacements, so an unreadable store is
        // simply overwritten.
        let mut all = self.read_all().unwrap_or_else(|e| {
            warn!("discarding unreadable store {}: {}", self.path.display(), e);
            Record::new()
        });
        all.extend(record);
        self.write_all(&all)
    }
}

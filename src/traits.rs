//! Core traits that decouple linkgrid from any specific storage backend,
//! bookmark provider, or transport mechanism.
//!
//! Every concrete backend (a JSON file, an in-memory map, a bookmark dump on
//! disk, a Unix-socket listener, a test harness, …) implements one of these
//! traits.  The [`Launcher`](crate::launcher::Launcher) only depends on these
//! abstractions.

use crate::bookmarks::BookmarkNode;
use crate::command::Command;
use std::sync::mpsc;
use std::sync::Arc;

/// A partial record read from or written to a [`KeyValueStore`]: top-level
/// keys mapped to arbitrary JSON values.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Abstraction over a durable key-value store.
///
/// Writes are whole-value replacements per key (last write wins), so callers
/// can always retry by writing the full snapshot again.
pub trait KeyValueStore: Send + 'static {
    /// The error type produced by this store.
    type Error: std::error::Error + Send + 'static;

    /// Fetch the values for `keys`.  Keys that have never been written are
    /// absent from the returned record rather than an error.
    fn get(&self, keys: &[&str]) -> Result<Record, Self::Error>;

    /// Store every key in `record`, leaving other keys untouched.
    fn set(&self, record: Record) -> Result<(), Self::Error>;
}

impl<T> KeyValueStore for Arc<T>
where
    T: KeyValueStore + Sync,
{
    type Error = T::Error;

    fn get(&self, keys: &[&str]) -> Result<Record, Self::Error> {
        (**self).get(keys)
    }

    fn set(&self, record: Record) -> Result<(), Self::Error> {
        (**self).set(record)
    }
}

/// A provider of the browser's bookmark tree.
///
/// Loading may be slow; the caller decides whether to wait for it.
pub trait BookmarkSource {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Return the root nodes of the bookmark tree.
    fn tree(&self) -> Result<Vec<BookmarkNode>, Self::Error>;
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, an in-memory
/// channel, …) and forward parsed commands into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    ///
    /// This method blocks the calling thread.  To run multiple sources
    /// concurrently, spawn each one on its own thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}

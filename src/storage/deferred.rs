//! Background writer with trailing-edge debouncing.
//!
//! The [`DeferredWriter`] owns a [`KeyValueStore`] on a dedicated thread.
//! Callers hand it snapshots in two ways:
//!
//! * [`schedule`](DeferredWriter::schedule): coalesce.  The snapshot is
//!   merged into a pending record and written once no further snapshot has
//!   arrived for `delay`.  Every new snapshot restarts the window.  This is
//!   what a drag gesture uses: dozens of intermediate orders collapse into a
//!   single write after the pointer settles.
//! * [`write_now`](DeferredWriter::write_now): write immediately and wait
//!   for the result.  Any pending record is merged first (the newer value
//!   wins per key), so a deferred write can never land after, and clobber, a
//!   later immediate one.
//!
//! Dropping the writer flushes whatever is still pending.

use super::StorageError;
use crate::traits::{KeyValueStore, Record};
use log::{debug, error, info};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

enum Message {
    Schedule(Record),
    WriteNow(Record, mpsc::Sender<Result<(), StorageError>>),
    Flush(mpsc::Sender<Result<(), StorageError>>),
}

/// Handle to the background writer thread.
pub struct DeferredWriter {
    tx: Option<mpsc::Sender<Message>>,
    handle: Option<JoinHandle<()>>,
}

impl DeferredWriter {
    /// Move `store` onto a new writer thread that coalesces scheduled
    /// snapshots within `delay`.
    pub fn spawn<S: KeyValueStore>(store: S, delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<Message>();
        let handle = std::thread::spawn(move || run(store, rx, delay));
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue `record` for a deferred write.
    pub fn schedule(&self, record: Record) {
        if let Some(tx) = &self.tx {
            if tx.send(Message::Schedule(record)).is_err() {
                error!("writer thread is gone, dropping deferred write");
            }
        }
    }

    /// Write `record` (merged over anything pending) right away.
    pub fn write_now(&self, record: Record) -> Result<(), StorageError> {
        self.request(|ack| Message::WriteNow(record, ack))
    }

    /// Write anything pending right away.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.request(Message::Flush)
    }

    fn request(
        &self,
        make: impl FnOnce(mpsc::Sender<Result<(), StorageError>>) -> Message,
    ) -> Result<(), StorageError> {
        let stopped = || StorageError::Unavailable("writer thread stopped".into());
        let tx = self.tx.as_ref().ok_or_else(stopped)?;
        let (ack_tx, ack_rx) = mpsc::channel();
        tx.send(make(ack_tx)).map_err(|_| stopped())?;
        ack_rx.recv().map_err(|_| stopped())?
    }
}

impl Drop for DeferredWriter {
    fn drop(&mut self) {
        // Closing the channel makes the thread flush and exit.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run<S: KeyValueStore>(store: S, rx: mpsc::Receiver<Message>, delay: Duration) {
    let mut pending: Option<Record> = None;
    loop {
        let msg = if pending.is_some() {
            match rx.recv_timeout(delay) {
                Ok(msg) => msg,
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(record) = pending.take() {
                        debug!("debounce window elapsed, writing");
                        let _ = commit(&store, record);
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match rx.recv() {
                Ok(msg) => msg,
                Err(_) => break,
            }
        };

        match msg {
            Message::Schedule(record) => {
                pending.get_or_insert_with(Record::new).extend(record);
            }
            Message::WriteNow(record, ack) => {
                let mut merged = pending.take().unwrap_or_default();
                merged.extend(record);
                let _ = ack.send(commit(&store, merged));
            }
            Message::Flush(ack) => {
                let result = match pending.take() {
                    Some(record) => commit(&store, record),
                    None => Ok(()),
                };
                let _ = ack.send(result);
            }
        }
    }

    if let Some(record) = pending.take() {
        info!("writer shutting down, flushing pending snapshot");
        let _ = commit(&store, record);
    }
}

/// Write one record, logging failures.  The in-memory model stays the source
/// of truth; the next write carries the full snapshot again.
fn commit<S: KeyValueStore>(store: &S, record: Record) -> Result<(), StorageError> {
    store.set(record).map_err(|e| {
        error!("persistence write failed: {}", e);
        StorageError::Unavailable(e.to_string())
    })
}

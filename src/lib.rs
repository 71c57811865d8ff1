//! **linkgrid**: the state engine of a categorized link launcher.
//!
//! Links are grouped into categories shown in a sidebar.  Five built-in
//! categories ship with default links; users add their own categories and
//! links, reorder links by dragging, import bookmarks or a whole backup, and
//! export everything to a dated JSON file.
//!
//! # Architecture
//!
//! The crate is organised around three core traits:
//!
//! * [`traits::KeyValueStore`]: abstracts the durable store so the model
//!   is not coupled to any specific backend.  [`storage`] provides a JSON
//!   file store, an in-memory fallback, and a debounced writer in front of
//!   either.
//! * [`traits::BookmarkSource`]: abstracts where the browser's bookmark
//!   tree comes from.
//! * [`traits::CommandSource`]: abstracts the transport that delivers
//!   user intent (a Unix socket, a test harness, …) so the main loop is not
//!   coupled to any specific IPC mechanism.
//!
//! [`launcher::Launcher`] owns the in-memory model and applies
//! [`command::Command`]s to it through the [`category`] and [`links`]
//! contracts.

pub mod bookmarks;
pub mod category;
pub mod command;
pub mod config;
pub mod defaults;
pub mod error;
pub mod icon;
pub mod ipc;
pub mod launcher;
pub mod links;
pub mod model;
pub mod reconcile;
pub mod storage;
pub mod tab;
pub mod traits;
pub mod transfer;

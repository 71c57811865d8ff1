//! Error taxonomy for the launcher state.
//!
//! Every variant is recoverable: the operation that produced it is aborted
//! (or, for bulk imports, partially applied) and the in-memory model stays
//! consistent.

use crate::model::CategoryId;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the category registry, link store, and the
/// [`Launcher`](crate::launcher::Launcher) that routes commands to them.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// Bad user input: empty required field, out-of-range position.
    #[error("validation error: {0}")]
    Validation(String),

    /// An import document failed structural validation.
    #[error("invalid import document: {0}")]
    InvalidFormat(String),

    #[error("category {category} is full ({capacity} links)")]
    CapacityExceeded { category: CategoryId, capacity: usize },

    #[error("category {0} cannot be edited")]
    NotEditable(CategoryId),

    #[error("category {0} cannot be deleted")]
    NotDeletable(CategoryId),

    /// The reserved "create category" id was used as a data bucket.
    #[error("category {0} is reserved and holds no links")]
    ReservedCategory(CategoryId),

    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),

    #[error("bookmark source error: {0}")]
    Bookmarks(String),

    #[error("no import is waiting for confirmation")]
    NoPendingImport,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LauncherError {
    /// Whether this is one of the refusals for a protected id, which the
    /// caller should treat as a silent no-op.
    pub fn is_protected_refusal(&self) -> bool {
        matches!(self, LauncherError::NotEditable(_) | LauncherError::NotDeletable(_))
    }
}

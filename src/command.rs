//! Commands accepted by the launcher.
//!
//! [`Command`] describes every user action the [`Launcher`](crate::launcher::Launcher)
//! can perform.  Commands arrive from a
//! [`CommandSource`](crate::traits::CommandSource) as externally tagged JSON,
//! one per line:
//!
//! ```json
//! {"SelectCategory":1}
//! {"AddLink":{"category":0,"link":{"name":"Docs","url":"https://docs.rs"}}}
//! {"Reorder":{"category":0,"from":3,"to":0}}
//! "EndDrag"
//! {"RemoveCategory":"1700000000000"}
//! ```
//!
//! Category ids may be given as numbers or numeric strings.

use crate::model::{CategoryId, Link};
use crate::tab::ActiveTab;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Every action the launcher can perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Make `id` the active category.  Selecting the reserved create id is a
    /// no-op; the UI opens its create dialog instead.
    SelectCategory(CategoryId),

    /// Create a custom category.  Unknown icon names fall back to the
    /// default icon.
    AddCategory { name: String, icon: String },

    /// Rename / re-icon a custom category.
    EditCategory {
        id: CategoryId,
        name: String,
        icon: String,
    },

    /// Delete a custom category together with its links.  The UI must have
    /// asked the user for confirmation already.
    RemoveCategory(CategoryId),

    /// Restore a category's shipped links (or empty it, for custom ones).
    ResetCategory(CategoryId),

    AddLink { category: CategoryId, link: Link },

    EditLink {
        category: CategoryId,
        index: usize,
        link: Link,
    },

    RemoveLink { category: CategoryId, index: usize },

    /// One step of a drag gesture.  The in-memory order changes
    /// immediately; the write is deferred.
    Reorder {
        category: CategoryId,
        from: usize,
        to: usize,
    },

    /// The drag gesture ended; write the final order now.
    EndDrag,

    /// Add the focused browser tab to the active category.
    QuickAdd(ActiveTab),

    /// Append links from a bookmark tree dump to the active category.
    /// `ids` restricts the import to those bookmark ids.
    ImportBookmarks {
        path: PathBuf,
        #[serde(default)]
        ids: Option<Vec<String>>,
    },

    /// Write an export file.  `directory` overrides the configured one.
    Export {
        #[serde(default)]
        directory: Option<PathBuf>,
    },

    /// Validate an import document and hold it until confirmed.
    StageImport { path: PathBuf },

    /// Apply the staged import, replacing all links and custom categories.
    ConfirmImport,

    /// Discard the staged import.
    CancelImport,
}

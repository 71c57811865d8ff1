//! The state container that ties the category registry, link store, and
//! persistence together.
//!
//! [`Launcher`] owns the single in-memory snapshot every view renders from.
//! All mutations go through the [`CategoryRegistry`] and [`LinkStore`]
//! contracts, after which the affected keys are handed to the
//! [`DeferredWriter`]: immediately for ordinary edits, debounced for drag
//! reorders.  Storage failures are logged and never roll back the in-memory
//! state; the next write carries the full snapshot again.
//!
//! Views subscribe to [`StateEvent`]s through [`Launcher::set_events`].

use crate::bookmarks::{flatten, JsonBookmarkFile, Selection};
use crate::category::{CategoryRegistry, SidebarEntry};
use crate::command::Command;
use crate::error::LauncherError;
use crate::links::{BulkOutcome, LinkStore};
use crate::model::{CategorizedLinks, Category, CategoryId, Link};
use crate::reconcile;
use crate::storage::{DeferredWriter, KEY_CATEGORIZED_LINKS, KEY_CUSTOM_CATEGORIES};
use crate::tab::ActiveTab;
use crate::traits::{BookmarkSource, KeyValueStore, Record};
use crate::transfer::{self, ExportDocument, ImportDocument};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Notifications sent to views over an [`mpsc`] channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// The links of one category changed.
    LinksChanged(CategoryId),
    /// The category list changed (added, edited, removed).
    CategoriesChanged,
    /// The active selection moved.
    ActiveCategoryChanged(CategoryId),
    /// The whole model was replaced; views must drop anything they derived
    /// from the previous snapshot.
    Reloaded,
    /// A user-visible, non-fatal message.
    Notice(String),
}

/// Owner of the launcher's in-memory model.
pub struct Launcher {
    registry: CategoryRegistry,
    links: LinkStore,
    active: CategoryId,
    staged_import: Option<ImportDocument>,
    writer: DeferredWriter,
    events: Option<mpsc::Sender<StateEvent>>,
    export_dir: PathBuf,
}

impl Launcher {
    /// Load persisted state from `store`, reconcile it with the shipped
    /// defaults, and take ownership of the store.
    ///
    /// Reorders are written once no further reorder arrived for
    /// `reorder_debounce`.
    pub fn load<S: KeyValueStore>(store: S, reorder_debounce: Duration) -> Self {
        let loaded = reconcile::load(&store);
        let registry = CategoryRegistry::new(loaded.custom_categories);
        let links = LinkStore::new(normalize_links(loaded.links, &registry));
        info!(
            "loaded {} custom categories, {} links",
            registry.custom().len(),
            links.snapshot().values().map(Vec::len).sum::<usize>()
        );
        Self {
            registry,
            links,
            active: CategoryId::PRIMARY,
            staged_import: None,
            writer: DeferredWriter::spawn(store, reorder_debounce),
            events: None,
            export_dir: PathBuf::from("."),
        }
    }

    /// Attach a view event channel.
    pub fn set_events(&mut self, tx: mpsc::Sender<StateEvent>) {
        self.events = Some(tx);
    }

    /// Directory used by [`Command::Export`] when none is given.
    pub fn set_export_dir(&mut self, dir: impl Into<PathBuf>) {
        self.export_dir = dir.into();
    }

    //  Accessors

    /// Sidebar rows: built-ins, custom categories, then the create entry.
    pub fn categories(&self) -> Vec<SidebarEntry> {
        self.registry.list()
    }

    pub fn custom_categories(&self) -> &[Category] {
        self.registry.custom()
    }

    pub fn links_for(&self, category: CategoryId) -> &[Link] {
        self.links.links_for(category)
    }

    /// The full link map.
    pub fn snapshot(&self) -> &CategorizedLinks {
        self.links.snapshot()
    }

    pub fn active_category(&self) -> CategoryId {
        self.active
    }

    /// The import waiting for confirmation, if any.
    pub fn staged_import(&self) -> Option<&ImportDocument> {
        self.staged_import.as_ref()
    }

    //  Categories

    /// Switch the active category.  The reserved create id is ignored.
    pub fn select_category(&mut self, id: CategoryId) -> Result<(), LauncherError> {
        if id.is_reserved() {
            debug!("create-category entry selected, nothing to activate");
            return Ok(());
        }
        if !self.registry.contains(id) {
            return Err(LauncherError::UnknownCategory(id));
        }
        if self.active != id {
            self.active = id;
            self.emit(StateEvent::ActiveCategoryChanged(id));
        }
        Ok(())
    }

    pub fn add_category(&mut self, name: &str, icon: &str) -> Result<Category, LauncherError> {
        let category = self.registry.add(name, icon)?;
        self.links.ensure_entry(category.id);
        self.persist_all();
        self.emit(StateEvent::CategoriesChanged);
        Ok(category)
    }

    pub fn edit_category(&mut self, id: CategoryId, name: &str, icon: &str) -> Result<(), LauncherError> {
        self.registry.edit(id, name, icon)?;
        self.persist_categories();
        self.emit(StateEvent::CategoriesChanged);
        Ok(())
    }

    /// Remove a custom category and its link list.  If it was active, the
    /// selection falls back to the primary category.
    pub fn remove_category(&mut self, id: CategoryId) -> Result<(), LauncherError> {
        self.registry.remove(id)?;
        self.links.drop_category(id);
        self.persist_all();
        self.emit(StateEvent::CategoriesChanged);
        if self.active == id {
            self.active = CategoryId::PRIMARY;
            self.emit(StateEvent::ActiveCategoryChanged(self.active));
        }
        Ok(())
    }

    /// Restore a category's shipped links (custom categories are emptied).
    pub fn reset_category(&mut self, id: CategoryId) -> Result<(), LauncherError> {
        self.ensure_link_bucket(id)?;
        self.links.reset_to_default(id)?;
        self.persist_links();
        self.emit(StateEvent::LinksChanged(id));
        Ok(())
    }

    //  Links

    /// Append `link` to `category` and return its index.
    pub fn add_link(&mut self, category: CategoryId, link: Link) -> Result<usize, LauncherError> {
        self.ensure_link_bucket(category)?;
        link.validate()?;
        let index = self.links.add(category, link).inspect_err(|e| {
            if matches!(e, LauncherError::CapacityExceeded { .. }) {
                self.notice(e.to_string());
            }
        })?;
        self.persist_links();
        self.emit(StateEvent::LinksChanged(category));
        Ok(index)
    }

    pub fn edit_link(&mut self, category: CategoryId, index: usize, link: Link) -> Result<(), LauncherError> {
        self.ensure_link_bucket(category)?;
        link.validate()?;
        self.links.edit(category, index, link)?;
        self.persist_links();
        self.emit(StateEvent::LinksChanged(category));
        Ok(())
    }

    /// Remove the link at `index`; out-of-range indices are ignored.
    pub fn remove_link(&mut self, category: CategoryId, index: usize) -> Option<Link> {
        let removed = self.links.remove(category, index)?;
        self.persist_links();
        self.emit(StateEvent::LinksChanged(category));
        Some(removed)
    }

    /// Move a link within its category.  The new order is visible at once;
    /// the write is debounced.  Returns whether anything moved.
    pub fn reorder(&mut self, category: CategoryId, from: usize, to: usize) -> bool {
        if !self.links.reorder(category, from, to) {
            return false;
        }
        debug!("reorder {}: {} -> {}", category, from, to);
        self.writer.schedule(self.links_record());
        self.emit(StateEvent::LinksChanged(category));
        true
    }

    /// Write the order left by a drag gesture without waiting for the
    /// debounce window.
    pub fn end_drag(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!("failed to persist reorder: {}", e);
        }
    }

    /// Add the focused browser tab to the active category.
    pub fn quick_add(&mut self, tab: &ActiveTab) -> Result<usize, LauncherError> {
        self.add_link(self.active, tab.to_link())
    }

    /// Append bookmarks to the active category, as many as fit.
    pub fn import_bookmarks<B: BookmarkSource>(
        &mut self,
        source: &B,
        selection: &Selection,
    ) -> Result<BulkOutcome, LauncherError> {
        let tree = source
            .tree()
            .map_err(|e| LauncherError::Bookmarks(e.to_string()))?;
        let candidates = flatten(&tree, selection);
        let category = self.active;
        self.ensure_link_bucket(category)?;
        let outcome = self.links.append_many(category, candidates)?;
        info!(
            "imported {} bookmark(s) into {}, dropped {}",
            outcome.added, category, outcome.dropped
        );
        if outcome.added > 0 {
            self.persist_links();
            self.emit(StateEvent::LinksChanged(category));
        }
        if outcome.dropped > 0 {
            self.notice(format!(
                "category is full: {} bookmark(s) not imported",
                outcome.dropped
            ));
        }
        Ok(outcome)
    }

    //  Import / export

    /// Export the current model.
    pub fn export(&self) -> ExportDocument {
        transfer::export_document(
            self.links.snapshot(),
            self.registry.builtins(),
            self.registry.custom(),
            chrono::Utc::now(),
        )
    }

    /// Export the current model into `dir` and return the file path.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, LauncherError> {
        transfer::write_export(&self.export(), dir)
    }

    /// Hold a validated import until [`confirm_import`](Self::confirm_import).
    /// A newer staged import replaces an older one.
    pub fn stage_import(&mut self, doc: ImportDocument) {
        info!(
            "import staged: {} custom categories, {} links",
            doc.custom_categories.len(),
            doc.link_count()
        );
        self.staged_import = Some(doc);
    }

    pub fn cancel_import(&mut self) {
        if self.staged_import.take().is_some() {
            info!("staged import discarded");
        }
    }

    /// Replace all links and custom categories with the staged import.
    pub fn confirm_import(&mut self) -> Result<(), LauncherError> {
        let doc = self.staged_import.take().ok_or(LauncherError::NoPendingImport)?;
        self.apply_import(doc);
        Ok(())
    }

    /// Replace all links and custom categories with `doc`, persist both, and
    /// tell views to reload.
    pub fn apply_import(&mut self, doc: ImportDocument) {
        self.registry.replace_custom(doc.custom_categories);
        self.links
            .replace_all(normalize_links(doc.links, &self.registry));
        if !self.registry.contains(self.active) {
            self.active = CategoryId::PRIMARY;
        }
        self.persist_all();
        info!("import applied");
        self.emit(StateEvent::Reloaded);
    }

    /// Write anything still pending.
    pub fn flush(&self) -> Result<(), LauncherError> {
        Ok(self.writer.flush()?)
    }

    //  Command dispatch

    /// Process a single [`Command`].
    ///
    /// Refusals for protected ids are swallowed (logged at debug level);
    /// every other failure is returned after the state has been left
    /// unchanged.
    pub fn handle(&mut self, cmd: Command) -> Result<(), LauncherError> {
        let result = match cmd {
            Command::SelectCategory(id) => self.select_category(id),
            Command::AddCategory { name, icon } => self.add_category(&name, &icon).map(|_| ()),
            Command::EditCategory { id, name, icon } => self.edit_category(id, &name, &icon),
            Command::RemoveCategory(id) => self.remove_category(id),
            Command::ResetCategory(id) => self.reset_category(id),
            Command::AddLink { category, link } => self.add_link(category, link).map(|_| ()),
            Command::EditLink {
                category,
                index,
                link,
            } => self.edit_link(category, index, link),
            Command::RemoveLink { category, index } => {
                self.remove_link(category, index);
                Ok(())
            }
            Command::Reorder { category, from, to } => {
                self.reorder(category, from, to);
                Ok(())
            }
            Command::EndDrag => {
                self.end_drag();
                Ok(())
            }
            Command::QuickAdd(tab) => self.quick_add(&tab).map(|_| ()),
            Command::ImportBookmarks { path, ids } => self
                .import_bookmarks(&JsonBookmarkFile::new(path), &Selection::from(ids))
                .map(|_| ()),
            Command::Export { directory } => {
                let dir = directory.unwrap_or_else(|| self.export_dir.clone());
                self.export_to(&dir).map(|path| {
                    self.notice(format!("exported to {}", path.display()));
                })
            }
            Command::StageImport { path } => transfer::read_import(&path).map(|doc| self.stage_import(doc)),
            Command::ConfirmImport => self.confirm_import(),
            Command::CancelImport => {
                self.cancel_import();
                Ok(())
            }
        };

        match result {
            Err(e) if e.is_protected_refusal() => {
                debug!("refused: {}", e);
                Ok(())
            }
            other => other,
        }
    }

    //  Internal

    /// `category` must be a real category able to hold links.
    fn ensure_link_bucket(&self, category: CategoryId) -> Result<(), LauncherError> {
        if category.is_reserved() {
            return Err(LauncherError::ReservedCategory(category));
        }
        if !self.registry.contains(category) {
            return Err(LauncherError::UnknownCategory(category));
        }
        Ok(())
    }

    fn links_record(&self) -> Record {
        let mut record = Record::new();
        match serde_json::to_value(self.links.snapshot()) {
            Ok(value) => {
                record.insert(KEY_CATEGORIZED_LINKS.into(), value);
            }
            Err(e) => warn!("failed to serialize links: {}", e),
        }
        record
    }

    fn categories_record(&self) -> Record {
        let mut record = Record::new();
        match serde_json::to_value(self.registry.custom()) {
            Ok(value) => {
                record.insert(KEY_CUSTOM_CATEGORIES.into(), value);
            }
            Err(e) => warn!("failed to serialize categories: {}", e),
        }
        record
    }

    fn persist_links(&self) {
        self.write(self.links_record());
    }

    fn persist_categories(&self) {
        self.write(self.categories_record());
    }

    /// Write both keys in one record so they never disagree on disk.
    fn persist_all(&self) {
        let mut record = self.links_record();
        record.extend(self.categories_record());
        self.write(record);
    }

    fn write(&self, record: Record) {
        if let Err(e) = self.writer.write_now(record) {
            warn!("persistence unavailable, keeping in-memory state: {}", e);
        }
    }

    fn emit(&self, event: StateEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn notice(&self, message: String) {
        info!("{}", message);
        self.emit(StateEvent::Notice(message));
    }
}

/// Bring a link map in line with the registry: every real category gets an
/// entry, lists for unknown or reserved ids are dropped, and names are cut
/// to the link name limit.
fn normalize_links(mut links: CategorizedLinks, registry: &CategoryRegistry) -> CategorizedLinks {
    links.retain(|id, list| {
        let keep = registry.contains(*id);
        if !keep {
            warn!("dropping {} link(s) of unknown category {}", list.len(), id);
        }
        keep
    });
    for list in links.values_mut() {
        *list = std::mem::take(list).into_iter().map(Link::normalized).collect();
    }
    for id in registry.ids() {
        links.entry(id).or_default();
    }
    links
}

//  Tests

//! Category registry.
//!
//! The [`CategoryRegistry`] owns the canonical category list: the five
//! code-defined built-ins followed by user-created categories in insertion
//! order.  The sidebar's "create category" button shares the id space (it
//! sits at [`CategoryId::CREATE`]) but is modelled as its own
//! [`SidebarEntry`] variant rather than as a fake category.
//!
//! Built-in and reserved ids are protected: edits and removals are refused
//! with [`LauncherError::NotEditable`] / [`LauncherError::NotDeletable`] and
//! leave the registry untouched.

use crate::defaults::{builtin_categories, CREATE_CATEGORY_NAME};
use crate::error::LauncherError;
use crate::icon::Icon;
use crate::model::{Category, CategoryId};
use log::{debug, info};

/// One row of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEntry {
    /// A real category that can be selected and holds links.
    Category(Category),
    /// The "create category" affordance; always last.
    CreateCategory,
}

impl SidebarEntry {
    pub fn id(&self) -> CategoryId {
        match self {
            SidebarEntry::Category(c) => c.id,
            SidebarEntry::CreateCategory => CategoryId::CREATE,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SidebarEntry::Category(c) => &c.name,
            SidebarEntry::CreateCategory => CREATE_CATEGORY_NAME,
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            SidebarEntry::Category(c) => c.icon,
            SidebarEntry::CreateCategory => Icon::Plus,
        }
    }
}

/// Canonical list of built-in and user-created categories.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    builtins: Vec<Category>,
    custom: Vec<Category>,
    /// Highest id handed out so far, so ids stay unique even if the clock
    /// does not move between two calls.
    last_issued: u64,
}

impl CategoryRegistry {
    /// Build a registry around a previously persisted custom list.
    ///
    /// Entries that collide with protected ids or repeat an earlier id are
    /// skipped.
    pub fn new(custom: Vec<Category>) -> Self {
        let mut registry = Self {
            builtins: builtin_categories(),
            custom: Vec::new(),
            last_issued: CategoryId::CREATE.0,
        };
        registry.replace_custom(custom);
        registry
    }

    //  Accessors

    /// Sidebar projection: built-ins, custom categories, then the create
    /// affordance.
    pub fn list(&self) -> Vec<SidebarEntry> {
        self.builtins
            .iter()
            .chain(self.custom.iter())
            .cloned()
            .map(SidebarEntry::Category)
            .chain(std::iter::once(SidebarEntry::CreateCategory))
            .collect()
    }

    /// Built-in categories, in fixed order.
    pub fn builtins(&self) -> &[Category] {
        &self.builtins
    }

    /// User-created categories, in insertion order.
    pub fn custom(&self) -> &[Category] {
        &self.custom
    }

    /// Look up a real category (built-in or custom).
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.builtins
            .iter()
            .chain(self.custom.iter())
            .find(|c| c.id == id)
    }

    /// Whether `id` names a real category that can hold links.
    pub fn contains(&self, id: CategoryId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of every real category, in sidebar order.
    pub fn ids(&self) -> Vec<CategoryId> {
        self.builtins
            .iter()
            .chain(self.custom.iter())
            .map(|c| c.id)
            .collect()
    }

    //  Mutation

    /// Create a category named `name` with the icon called `icon`.
    ///
    /// An unknown icon name falls back to [`Icon::FALLBACK`]; an empty name
    /// is a validation error.
    pub fn add(&mut self, name: &str, icon: &str) -> Result<Category, LauncherError> {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.add_at(name, icon, now)
    }

    /// [`add`](Self::add) with an explicit clock reading (milliseconds).
    pub fn add_at(&mut self, name: &str, icon: &str, now_ms: u64) -> Result<Category, LauncherError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LauncherError::Validation("category name must not be empty".into()));
        }
        let icon = Icon::from_name_or_default(icon);
        let id = CategoryId(now_ms.max(self.last_issued + 1));
        self.last_issued = id.0;
        let category = Category::new(id, name, icon);
        info!("added category {} ({:?})", id, name);
        self.custom.push(category.clone());
        Ok(category)
    }

    /// Rename and re-icon a custom category.
    pub fn edit(&mut self, id: CategoryId, name: &str, icon: &str) -> Result<(), LauncherError> {
        if id.is_protected() {
            debug!("refusing to edit protected category {}", id);
            return Err(LauncherError::NotEditable(id));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(LauncherError::Validation("category name must not be empty".into()));
        }
        let category = self
            .custom
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(LauncherError::UnknownCategory(id))?;
        category.name = name.to_string();
        category.icon = Icon::from_name_or_default(icon);
        info!("edited category {}", id);
        Ok(())
    }

    /// Remove a custom category and return it.  The caller is responsible
    /// for dropping its link list.
    pub fn remove(&mut self, id: CategoryId) -> Result<Category, LauncherError> {
        if id.is_protected() {
            debug!("refusing to delete protected category {}", id);
            return Err(LauncherError::NotDeletable(id));
        }
        let pos = self
            .custom
            .iter()
            .position(|c| c.id == id)
            .ok_or(LauncherError::UnknownCategory(id))?;
        info!("removed category {}", id);
        Ok(self.custom.remove(pos))
    }

    /// Replace the whole custom list (load and import).
    pub fn replace_custom(&mut self, custom: Vec<Category>) {
        self.custom.clear();
        for category in custom {
            if category.id.is_protected() || self.contains(category.id) {
                debug!("skipping custom category with unusable id {}", category.id);
                continue;
            }
            self.last_issued = self.last_issued.max(category.id.0);
            self.custom.push(category);
        }
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

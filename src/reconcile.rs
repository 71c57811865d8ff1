//! Load-time reconciliation of persisted state with the shipped defaults.
//!
//! Every category the default dataset knows about that is missing or empty
//! in the persisted map is seeded from the defaults.  Non-empty persisted
//! lists are never touched, so links shipped with an update appear without
//! erasing anything the user customised.
//!
//! Unreadable state (storage down, unparsable JSON) is not fatal: the full
//! default dataset is used and the problem is logged.

use crate::defaults::default_links;
use crate::model::{CategorizedLinks, Category, MAX_LINKS_PER_CATEGORY};
use crate::storage::{KEY_CATEGORIZED_LINKS, KEY_CUSTOM_CATEGORIES};
use crate::traits::KeyValueStore;
use log::{info, warn};

/// State recovered from storage, after reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedState {
    pub links: CategorizedLinks,
    pub custom_categories: Vec<Category>,
}

/// Merge `persisted` with `defaults`.
///
/// `None` means nothing usable was persisted, in which case the defaults are
/// returned as-is.
pub fn reconcile(persisted: Option<CategorizedLinks>, defaults: &CategorizedLinks) -> CategorizedLinks {
    let Some(mut links) = persisted else {
        return defaults.clone();
    };
    for (id, shipped) in defaults {
        let entry = links.entry(*id).or_default();
        if entry.is_empty() && !shipped.is_empty() {
            info!("seeding category {} with {} default link(s)", id, shipped.len());
            *entry = shipped.clone();
        }
    }
    links
}

/// Cut every list down to the category capacity, keeping the first links.
fn enforce_capacity(mut links: CategorizedLinks) -> CategorizedLinks {
    for (id, list) in links.iter_mut() {
        if list.len() > MAX_LINKS_PER_CATEGORY {
            warn!(
                "persisted category {} holds {} links, dropping {}",
                id,
                list.len(),
                list.len() - MAX_LINKS_PER_CATEGORY
            );
            list.truncate(MAX_LINKS_PER_CATEGORY);
        }
    }
    links
}

/// Read both persisted keys from `store` and reconcile them with the
/// shipped defaults.  Never fails.
pub fn load<S: KeyValueStore>(store: &S) -> LoadedState {
    let defaults = default_links();
    let record = match store.get(&[KEY_CATEGORIZED_LINKS, KEY_CUSTOM_CATEGORIES]) {
        Ok(record) => record,
        Err(e) => {
            warn!("failed to read persisted state, using defaults: {}", e);
            return LoadedState {
                links: defaults,
                custom_categories: Vec::new(),
            };
        }
    };

    let persisted_links = match record.get(KEY_CATEGORIZED_LINKS) {
        None => None,
        Some(value) => match serde_json::from_value::<CategorizedLinks>(value.clone()) {
            Ok(links) => Some(enforce_capacity(links)),
            Err(e) => {
                warn!("persisted {} unreadable, using defaults: {}", KEY_CATEGORIZED_LINKS, e);
                None
            }
        },
    };

    let custom_categories = match record.get(KEY_CUSTOM_CATEGORIES) {
        None => Vec::new(),
        Some(value) => serde_json::from_value::<Vec<Category>>(value.clone()).unwrap_or_else(|e| {
            warn!("persisted {} unreadable, ignoring: {}", KEY_CUSTOM_CATEGORIES, e);
            Vec::new()
        }),
    };

    LoadedState {
        links: reconcile(persisted_links, &defaults),
        custom_categories,
    }
}

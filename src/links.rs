//! Per-category link lists.
//!
//! The [`LinkStore`] owns the [`CategorizedLinks`] map.  Each category's
//! list is ordered and capped at [`MAX_LINKS_PER_CATEGORY`]; a link's
//! identity is its position.  The reserved create-category id never holds
//! links.
//!
//! The store is pure in-memory state.  Persistence is the caller's job
//! (see [`Launcher`](crate::launcher::Launcher)).

use crate::defaults::default_links_for;
use crate::error::LauncherError;
use crate::model::{CategorizedLinks, CategoryId, Link, MAX_LINKS_PER_CATEGORY};
use log::{debug, warn};

/// Result of a capacity-aware bulk append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Candidates appended, in their original order.
    pub added: usize,
    /// Candidates that did not fit.
    pub dropped: usize,
}

/// Ordered link lists keyed by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkStore {
    links: CategorizedLinks,
}

impl LinkStore {
    pub fn new(links: CategorizedLinks) -> Self {
        Self { links }
    }

    //  Accessors

    /// Links of `category`, empty when the category has no entry.
    pub fn links_for(&self, category: CategoryId) -> &[Link] {
        self.links.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The whole map, as persisted and exported.
    pub fn snapshot(&self) -> &CategorizedLinks {
        &self.links
    }

    /// Free slots left in `category`.
    pub fn remaining_capacity(&self, category: CategoryId) -> usize {
        MAX_LINKS_PER_CATEGORY.saturating_sub(self.links_for(category).len())
    }

    //  Mutation

    /// Append `link` to `category` and return its index.
    pub fn add(&mut self, category: CategoryId, link: Link) -> Result<usize, LauncherError> {
        Self::ensure_not_reserved(category)?;
        let list = self.links.entry(category).or_default();
        if list.len() >= MAX_LINKS_PER_CATEGORY {
            return Err(LauncherError::CapacityExceeded {
                category,
                capacity: MAX_LINKS_PER_CATEGORY,
            });
        }
        list.push(link.normalized());
        Ok(list.len() - 1)
    }

    /// Append as many of `candidates` as fit, in order.  Never fails
    /// wholesale because of capacity; the overflow is reported instead.
    pub fn append_many(
        &mut self,
        category: CategoryId,
        candidates: Vec<Link>,
    ) -> Result<BulkOutcome, LauncherError> {
        Self::ensure_not_reserved(category)?;
        let room = self.remaining_capacity(category);
        let total = candidates.len();
        let list = self.links.entry(category).or_default();
        list.extend(candidates.into_iter().take(room).map(Link::normalized));
        let added = total.min(room);
        let outcome = BulkOutcome {
            added,
            dropped: total - added,
        };
        if outcome.dropped > 0 {
            warn!(
                "category {} full: appended {}, dropped {}",
                category, outcome.added, outcome.dropped
            );
        }
        Ok(outcome)
    }

    /// Remove the link at `index`.  Out-of-range indices are a no-op.
    pub fn remove(&mut self, category: CategoryId, index: usize) -> Option<Link> {
        let list = self.links.get_mut(&category)?;
        if index >= list.len() {
            debug!("remove: index {} out of range in category {}", index, category);
            return None;
        }
        Some(list.remove(index))
    }

    /// Replace the link at `index`.
    pub fn edit(&mut self, category: CategoryId, index: usize, link: Link) -> Result<(), LauncherError> {
        let slot = self
            .links
            .get_mut(&category)
            .and_then(|list| list.get_mut(index))
            .ok_or_else(|| {
                LauncherError::Validation(format!("no link at index {} in category {}", index, category))
            })?;
        *slot = link.normalized();
        Ok(())
    }

    /// Move the link at `from` so it ends up at `to`, shifting the links in
    /// between by one.  `to` counts positions in the list after removal.
    ///
    /// Returns `false` (and changes nothing) when `from == to` or either
    /// index is out of range.
    pub fn reorder(&mut self, category: CategoryId, from: usize, to: usize) -> bool {
        let Some(list) = self.links.get_mut(&category) else {
            return false;
        };
        if from == to || from >= list.len() || to >= list.len() {
            return false;
        }
        let link = list.remove(from);
        list.insert(to, link);
        true
    }

    /// Restore `category` to its shipped defaults (built-ins) or to an
    /// empty list (custom categories).
    pub fn reset_to_default(&mut self, category: CategoryId) -> Result<(), LauncherError> {
        Self::ensure_not_reserved(category)?;
        let list = default_links_for(category).unwrap_or_default();
        self.links.insert(category, list);
        Ok(())
    }

    /// Make sure `category` has an (empty) entry.
    pub fn ensure_entry(&mut self, category: CategoryId) {
        if !category.is_reserved() {
            self.links.entry(category).or_default();
        }
    }

    /// Remove `category`'s entry entirely.
    pub fn drop_category(&mut self, category: CategoryId) -> Option<Vec<Link>> {
        self.links.remove(&category)
    }

    /// Replace the whole map (import).
    pub fn replace_all(&mut self, links: CategorizedLinks) {
        self.links = links;
    }

    fn ensure_not_reserved(category: CategoryId) -> Result<(), LauncherError> {
        if category.is_reserved() {
            Err(LauncherError::ReservedCategory(category))
        } else {
            Ok(())
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM: CategoryId = CategoryId(1_700_000_000_000);

    fn link(n: usize) -> Link {
        Link::new(format!("L{}", n), format!("https://l{}.example", n))
    }

    fn store_with(category: CategoryId, n: usize) -> LinkStore {
        let mut map = CategorizedLinks::new();
        map.insert(category, (0..n).map(link).collect());
        LinkStore::new(map)
    }

    fn names(store: &LinkStore, category: CategoryId) -> Vec<String> {
        store.links_for(category).iter().map(|l| l.name.clone()).collect()
    }

    #[test]
    fn links_for_missing_category_is_empty() {
        let store = LinkStore::default();
        assert!(store.links_for(CUSTOM).is_empty());
    }

    #[test]
    fn add_appends_and_truncates_name() {
        let mut store = LinkStore::default();
        let idx = store
            .add(CUSTOM, Link::new("A very long link name indeed", "https://x"))
            .unwrap();
        assert_eq!(idx, 0);
        assert_eq!(store.links_for(CUSTOM)[0].name, "A very long link nam");
    }

    #[test]
    fn add_to_full_category_is_rejected_without_change() {
        let mut store = store_with(CUSTOM, MAX_LINKS_PER_CATEGORY);
        let before = store.clone();
        let err = store.add(CUSTOM, link(99)).unwrap_err();
        assert!(matches!(err, LauncherError::CapacityExceeded { capacity: 45, .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn reserved_category_never_holds_links() {
        let mut store = LinkStore::default();
        assert!(matches!(
            store.add(CategoryId::CREATE, link(0)),
            Err(LauncherError::ReservedCategory(_))
        ));
        assert!(store.append_many(CategoryId::CREATE, vec![link(0)]).is_err());
        store.ensure_entry(CategoryId::CREATE);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn append_many_partially_fills() {
        let mut store = store_with(CUSTOM, 44);
        let outcome = store
            .append_many(CUSTOM, vec![link(100), link(101), link(102)])
            .unwrap();
        assert_eq!(outcome, BulkOutcome { added: 1, dropped: 2 });
        assert_eq!(store.links_for(CUSTOM).len(), 45);
        assert_eq!(store.links_for(CUSTOM)[44].name, "L100");
        assert_eq!(store.links_for(CUSTOM)[0].name, "L0");
    }

    #[test]
    fn append_many_into_full_category_drops_all() {
        let mut store = store_with(CUSTOM, 45);
        let outcome = store.append_many(CUSTOM, vec![link(1)]).unwrap();
        assert_eq!(outcome, BulkOutcome { added: 0, dropped: 1 });
    }

    #[test]
    fn remove_by_position() {
        let mut store = store_with(CUSTOM, 3);
        let removed = store.remove(CUSTOM, 1).unwrap();
        assert_eq!(removed.name, "L1");
        assert_eq!(names(&store, CUSTOM), vec!["L0", "L2"]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut store = store_with(CUSTOM, 2);
        assert!(store.remove(CUSTOM, 5).is_none());
        assert!(store.remove(CategoryId(3), 0).is_none());
        assert_eq!(store.links_for(CUSTOM).len(), 2);
    }

    #[test]
    fn edit_replaces_in_place() {
        let mut store = store_with(CUSTOM, 3);
        store.edit(CUSTOM, 2, Link::new("New", "https://new")).unwrap();
        assert_eq!(names(&store, CUSTOM), vec!["L0", "L1", "New"]);
        assert!(store.edit(CUSTOM, 3, link(9)).is_err());
    }

    #[test]
    fn reorder_moves_forward_and_backward() {
        let mut store = store_with(CUSTOM, 5);
        assert!(store.reorder(CUSTOM, 0, 3));
        assert_eq!(names(&store, CUSTOM), vec!["L1", "L2", "L3", "L0", "L4"]);
        assert!(store.reorder(CUSTOM, 4, 1));
        assert_eq!(names(&store, CUSTOM), vec!["L1", "L4", "L2", "L3", "L0"]);
    }

    #[test]
    fn reorder_same_index_or_out_of_range_is_noop() {
        let mut store = store_with(CUSTOM, 3);
        let before = store.clone();
        assert!(!store.reorder(CUSTOM, 1, 1));
        assert!(!store.reorder(CUSTOM, 3, 0));
        assert!(!store.reorder(CUSTOM, 0, 3));
        assert!(!store.reorder(CategoryId(2), 0, 1));
        assert_eq!(store, before);
    }

    #[test]
    fn reorder_then_reverse_restores_order() {
        let n = 6;
        for i in 0..n {
            for j in 0..n {
                let mut store = store_with(CUSTOM, n);
                let original = names(&store, CUSTOM);
                store.reorder(CUSTOM, i, j);
                // The moved element now sits at `j`; moving it back to `i`
                // must restore the original sequence.
                store.reorder(CUSTOM, j, i);
                assert_eq!(names(&store, CUSTOM), original, "i={} j={}", i, j);
            }
        }
    }

    #[test]
    fn reorder_is_a_permutation() {
        let mut store = store_with(CUSTOM, 8);
        store.reorder(CUSTOM, 7, 2);
        store.reorder(CUSTOM, 1, 6);
        let mut got = names(&store, CUSTOM);
        got.sort();
        let mut expected: Vec<String> = (0..8).map(|n| format!("L{}", n)).collect();
        expected.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn reset_builtin_restores_defaults() {
        let mut store = store_with(CategoryId(1), 2);
        store.reset_to_default(CategoryId(1)).unwrap();
        assert_eq!(
            store.links_for(CategoryId(1)),
            default_links_for(CategoryId(1)).unwrap().as_slice()
        );
    }

    #[test]
    fn reset_custom_empties_list() {
        let mut store = store_with(CUSTOM, 4);
        store.reset_to_default(CUSTOM).unwrap();
        assert!(store.links_for(CUSTOM).is_empty());
        assert!(store.snapshot().contains_key(&CUSTOM));
    }

    #[test]
    fn drop_category_removes_entry() {
        let mut store = store_with(CUSTOM, 1);
        store.drop_category(CUSTOM);
        assert!(!store.snapshot().contains_key(&CUSTOM));
    }

    #[test]
    fn remaining_capacity_counts_down() {
        let store = store_with(CUSTOM, 40);
        assert_eq!(store.remaining_capacity(CUSTOM), 5);
        assert_eq!(store.remaining_capacity(CategoryId(4)), 45);
    }
}

//! Read-only catalog snapshot for one screen session.

use crate::catalog::CatalogItem;
use std::collections::HashSet;

/// In-memory snapshot of the items fetched when a screen mounts.
///
/// The snapshot is replaced wholesale on every fetch and never mutated in
/// between, so anything derived from it (filtered views, favorite state) can
/// hold on to ids without worrying about edits underneath.
#[derive(Debug, Clone)]
pub struct CatalogStore<T> {
    items: Vec<T>,
    loaded: bool,
}

impl<T> Default for CatalogStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
        }
    }
}

impl<T: CatalogItem> CatalogStore<T> {
    /// Builds a snapshot from a bulk fetch.
    ///
    /// Ids are unique within a snapshot: later duplicates are dropped with a
    /// warning so the filter can never surface the same item twice.
    #[must_use]
    pub fn from_fetch(items: Vec<T>) -> Self {
        let fetched = items.len();
        let mut seen = HashSet::with_capacity(fetched);
        let items: Vec<T> = items
            .into_iter()
            .filter(|item| seen.insert(item.id().to_string()))
            .collect();

        if items.len() != fetched {
            tracing::warn!(
                fetched = fetched,
                kept = items.len(),
                "dropped duplicate ids from catalog fetch"
            );
        }

        Self {
            items,
            loaded: true,
        }
    }

    #[must_use]
    pub fn all(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `false` until the first fetch lands; screens show a spinner meanwhile.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Listing};

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let store = CatalogStore::from_fetch(vec![
            Listing::new("1", Category::Dog, "Max", ""),
            Listing::new("1", Category::Cat, "Impostor", ""),
            Listing::new("2", Category::Cat, "Luna", ""),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1").map(|l| l.name.as_str()), Some("Max"));
    }

    #[test]
    fn default_store_is_not_loaded() {
        let store: CatalogStore<Listing> = CatalogStore::default();
        assert!(!store.is_loaded());
        assert!(store.is_empty());
        assert!(CatalogStore::<Listing>::from_fetch(vec![]).is_loaded());
    }
}

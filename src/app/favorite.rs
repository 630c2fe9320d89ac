//! Optimistic favorite toggles.
//!
//! A toggle is applied locally before the storage write is confirmed. Each
//! listing's flag is a [`Tentative`] value: `begin` applies the new value,
//! then exactly one of `confirm` or `rollback` settles it once the worker
//! answers.

use std::collections::HashMap;

/// Flips a favorite flag.
#[must_use]
pub const fn toggle(current: bool) -> bool {
    !current
}

/// A committed value with at most one optimistic change in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tentative<T> {
    committed: T,
    pending: Option<T>,
}

impl<T: Clone + PartialEq> Tentative<T> {
    #[must_use]
    pub const fn new(committed: T) -> Self {
        Self {
            committed,
            pending: None,
        }
    }

    /// The value to display: the pending one if a change is in flight.
    #[must_use]
    pub fn value(&self) -> &T {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    #[must_use]
    pub const fn committed(&self) -> &T {
        &self.committed
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies `next` tentatively.
    ///
    /// Returns `false`, leaving the value untouched, if a change is already in
    /// flight.
    pub fn begin(&mut self, next: T) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(next);
        true
    }

    /// Makes the pending value the committed one.
    ///
    /// Returns `false` if nothing was pending or the pending value differs
    /// from `expected`.
    pub fn confirm(&mut self, expected: &T) -> bool {
        match self.pending.take() {
            Some(value) if &value == expected => {
                self.committed = value;
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Discards the pending value and returns the committed one.
    pub fn rollback(&mut self) -> &T {
        self.pending = None;
        &self.committed
    }
}

/// Snapshot of one listing's favorite flag for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteState {
    pub listing_id: String,
    pub is_favorite: bool,
    pub syncing: bool,
}

/// Per-listing favorite flags owned by the screen controller.
///
/// Never touches the catalog snapshot; listings without an entry read as not
/// favorited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    flags: HashMap<String, Tentative<bool>>,
}

impl Favorites {
    /// Replaces every flag with the committed set `favorite_ids`.
    ///
    /// Flags with a sync in flight keep their pending value so a late
    /// confirmation still lands.
    pub fn reset<'a>(&mut self, favorite_ids: impl IntoIterator<Item = &'a str>) {
        let in_flight: HashMap<String, Tentative<bool>> = self
            .flags
            .drain()
            .filter(|(_, flag)| flag.is_pending())
            .collect();

        self.flags = favorite_ids
            .into_iter()
            .map(|id| (id.to_string(), Tentative::new(true)))
            .collect();

        for (id, flag) in in_flight {
            self.flags.insert(id, flag);
        }
    }

    /// Marks `ids` as committed favorites without touching other entries.
    pub fn mark<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.flags
                .entry(id.to_string())
                .and_modify(|flag| {
                    if !flag.is_pending() {
                        *flag = Tentative::new(true);
                    }
                })
                .or_insert_with(|| Tentative::new(true));
        }
    }

    /// Records a freshly loaded value for `listing_id` as committed.
    ///
    /// Returns `false` and leaves the flag alone while a sync is in flight.
    pub fn commit_loaded(&mut self, listing_id: &str, is_favorite: bool) -> bool {
        if self.is_syncing(listing_id) {
            return false;
        }
        self.flags
            .insert(listing_id.to_string(), Tentative::new(is_favorite));
        true
    }

    /// Drops every flag, including in-flight ones.
    pub fn clear(&mut self) {
        self.flags.clear();
    }

    #[must_use]
    pub fn is_favorite(&self, listing_id: &str) -> bool {
        self.flags
            .get(listing_id)
            .is_some_and(|flag| *flag.value())
    }

    #[must_use]
    pub fn is_syncing(&self, listing_id: &str) -> bool {
        self.flags.get(listing_id).is_some_and(Tentative::is_pending)
    }

    #[must_use]
    pub fn state(&self, listing_id: &str) -> FavoriteState {
        FavoriteState {
            listing_id: listing_id.to_string(),
            is_favorite: self.is_favorite(listing_id),
            syncing: self.is_syncing(listing_id),
        }
    }

    /// Optimistically flips the flag for `listing_id`.
    ///
    /// Returns the new value to persist, or `None` if a sync for this listing
    /// is still in flight.
    pub fn begin_toggle(&mut self, listing_id: &str) -> Option<bool> {
        let flag = self
            .flags
            .entry(listing_id.to_string())
            .or_insert_with(|| Tentative::new(false));
        let next = toggle(*flag.value());
        flag.begin(next).then_some(next)
    }

    /// Commits a successful sync. Returns `false` for a stale confirmation.
    pub fn confirm(&mut self, listing_id: &str, is_favorite: bool) -> bool {
        self.flags
            .get_mut(listing_id)
            .is_some_and(|flag| flag.confirm(&is_favorite))
    }

    /// Reverts a failed sync and returns the restored value.
    pub fn rollback(&mut self, listing_id: &str) -> bool {
        self.flags
            .get_mut(listing_id)
            .is_some_and(|flag| *flag.rollback())
    }

    /// Ids currently shown as favorites, unordered.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, flag)| *flag.value())
            .map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_is_identity() {
        for start in [true, false] {
            assert_eq!(toggle(toggle(start)), start);
        }
    }

    #[test]
    fn tentative_confirm_and_rollback() {
        let mut flag = Tentative::new(false);
        assert!(flag.begin(true));
        assert!(*flag.value());
        assert!(!flag.begin(false));
        assert!(flag.confirm(&true));
        assert!(*flag.committed());

        assert!(flag.begin(false));
        assert!(*flag.rollback());
        assert!(*flag.value());
        assert!(!flag.is_pending());
    }

    #[test]
    fn stale_confirmation_keeps_pending_value() {
        let mut flag = Tentative::new(false);
        flag.begin(true);
        assert!(!flag.confirm(&false));
        assert!(flag.is_pending());
        assert!(*flag.value());
    }

    #[test]
    fn failed_sync_restores_pre_toggle_value() {
        let mut favorites = Favorites::default();
        favorites.reset(["1"]);

        assert_eq!(favorites.begin_toggle("1"), Some(false));
        assert!(!favorites.is_favorite("1"));
        assert!(favorites.is_syncing("1"));

        assert!(favorites.rollback("1"));
        assert!(favorites.is_favorite("1"));
        assert!(!favorites.is_syncing("1"));
    }

    #[test]
    fn toggle_is_ignored_while_in_flight() {
        let mut favorites = Favorites::default();
        assert_eq!(favorites.begin_toggle("2"), Some(true));
        assert_eq!(favorites.begin_toggle("2"), None);
        assert!(favorites.confirm("2", true));
        assert_eq!(favorites.begin_toggle("2"), Some(false));
    }

    #[test]
    fn reset_keeps_in_flight_flags() {
        let mut favorites = Favorites::default();
        favorites.begin_toggle("3");
        favorites.reset(["1"]);
        assert!(favorites.is_favorite("1"));
        assert!(favorites.is_syncing("3"));
        assert!(favorites.confirm("3", true));
        assert!(favorites.is_favorite("3"));
    }

    #[test]
    fn loaded_value_replaces_committed_flag() {
        let mut favorites = Favorites::default();
        favorites.reset(["1"]);
        assert!(favorites.commit_loaded("1", false));
        assert!(!favorites.is_favorite("1"));
        assert!(favorites.commit_loaded("2", true));
        assert!(favorites.is_favorite("2"));
    }

    #[test]
    fn loaded_value_ignored_while_in_flight() {
        let mut favorites = Favorites::default();
        assert_eq!(favorites.begin_toggle("1"), Some(true));
        assert!(!favorites.commit_loaded("1", false));
        assert!(favorites.is_favorite("1"));
        assert!(favorites.is_syncing("1"));
    }
}

//! Application state management and view model computation.
//!
//! [`AppState`] is the single source of truth for one screen session: the
//! fetched catalog snapshots, the filter inputs, the derived visible subset,
//! per-listing favorite flags and the transient notice line.
//!
//! Core data (snapshots) is kept apart from derived state (`filtered_ids`,
//! `selected_index`), which is recomputed by [`AppState::apply_filter`] after
//! every change to the inputs.
//!
//! # Example
//!
//! ```rust
//! use shelter::app::AppState;
//! use shelter::catalog::{CatalogStore, CategoryFilter};
//! use shelter::domain::{Category, Listing};
//!
//! let mut state = AppState::new();
//! state.listings = CatalogStore::from_fetch(vec![
//!     Listing::new("1", Category::Dog, "Max", ""),
//!     Listing::new("2", Category::Cat, "Luna", ""),
//! ]);
//! state.criteria.category = CategoryFilter::Only(Category::Cat);
//! state.apply_filter();
//! assert_eq!(state.filtered_ids, vec!["2"]);
//! let viewmodel = state.compute_viewmodel(24);
//! assert_eq!(viewmodel.display_items.len(), 1);
//! ```

use super::favorite::Favorites;
use super::modes::{EventTab, InputMode, SearchFocus, ViewMode};
use crate::catalog::{matching, CatalogStore, CategoryFilter, FilterCriteria};
use crate::domain::{Listing, ShelterEvent};
use crate::ui::viewmodel::{
    DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, UIViewModel,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// The record opened from a list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    Listing(Listing),
    Event {
        event: ShelterEvent,
        is_registered: bool,
    },
}

/// Central application state container.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Animal catalog snapshot, replaced on every `ListingsLoaded`.
    pub listings: CatalogStore<Listing>,

    /// Event snapshot, replaced on every `EventsLoaded`.
    pub events: CatalogStore<ShelterEvent>,

    /// The signed-in user's favorites, replaced on every `FavoritesLoaded`.
    pub favorite_listings: CatalogStore<Listing>,

    /// Filter Engine inputs.
    pub criteria: FilterCriteria,

    /// Ids passing the current view, tab and criteria, in snapshot order.
    ///
    /// Recomputed by `apply_filter()`.
    pub filtered_ids: Vec<String>,

    /// Zero-based index into `filtered_ids`, clamped by `apply_filter()`.
    pub selected_index: usize,

    pub input_mode: InputMode,
    pub view_mode: ViewMode,
    pub event_tab: EventTab,

    /// Optimistic favorite flags, one per listing the user has touched or
    /// that was loaded as a favorite.
    pub favorites: Favorites,

    /// Event ids the signed-in user is registered for.
    pub registered: HashSet<String>,

    /// Record opened with a detail request, if any.
    pub detail: Option<Detail>,

    /// Transient message shown above the footer until dismissed.
    pub notice: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the cursor down one row, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        if self.filtered_ids.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.filtered_ids.len();
    }

    /// Moves the cursor up one row, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        if self.filtered_ids.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.filtered_ids.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Id under the cursor in the current view.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.filtered_ids.get(self.selected_index).map(String::as_str)
    }

    /// The snapshot backing the current view, for the listing views.
    fn listing_source(&self) -> Option<&CatalogStore<Listing>> {
        match self.view_mode {
            ViewMode::Animals => Some(&self.listings),
            ViewMode::Favorites => Some(&self.favorite_listings),
            ViewMode::Events => None,
        }
    }

    /// Looks a listing up in either the catalog or the favorites snapshot.
    #[must_use]
    pub fn find_listing(&self, id: &str) -> Option<&Listing> {
        self.listings
            .get(id)
            .or_else(|| self.favorite_listings.get(id))
    }

    #[must_use]
    pub fn selected_listing(&self) -> Option<&Listing> {
        let id = self.selected_id()?;
        self.listing_source()?.get(id)
    }

    #[must_use]
    pub fn selected_event(&self) -> Option<&ShelterEvent> {
        if self.view_mode != ViewMode::Events {
            return None;
        }
        self.events.get(self.selected_id()?)
    }

    /// Visible listings in snapshot order. Empty in the events view.
    #[must_use]
    pub fn visible_listings(&self) -> Vec<&Listing> {
        self.listing_source().map_or_else(Vec::new, |source| {
            self.filtered_ids
                .iter()
                .filter_map(|id| source.get(id))
                .collect()
        })
    }

    /// Visible events in snapshot order. Empty outside the events view.
    #[must_use]
    pub fn visible_events(&self) -> Vec<&ShelterEvent> {
        if self.view_mode != ViewMode::Events {
            return Vec::new();
        }
        self.filtered_ids
            .iter()
            .filter_map(|id| self.events.get(id))
            .collect()
    }

    /// Recomputes the visible subset against the current clock.
    pub fn apply_filter(&mut self) {
        self.apply_filter_at(Utc::now());
    }

    /// Recomputes `filtered_ids` from the active snapshot and criteria.
    ///
    /// Events have no category, so the events view matches on the query alone
    /// and partitions by tab around `now`.
    pub fn apply_filter_at(&mut self, now: DateTime<Utc>) {
        let _span = tracing::debug_span!("apply_filter",
            view_mode = ?self.view_mode,
            category = %self.criteria.category,
            query_len = self.criteria.query.len()
        )
        .entered();

        self.filtered_ids = match self.view_mode {
            ViewMode::Animals => matching(self.listings.all(), &self.criteria)
                .map(|listing| listing.id.clone())
                .collect(),
            ViewMode::Favorites => matching(self.favorite_listings.all(), &self.criteria)
                .map(|listing| listing.id.clone())
                .collect(),
            ViewMode::Events => {
                let criteria = FilterCriteria::new(CategoryFilter::All, self.criteria.query.clone());
                let tab = self.event_tab;
                matching(self.events.all(), &criteria)
                    .filter(|event| match tab {
                        EventTab::Upcoming => event.is_upcoming(now),
                        EventTab::Past => event.is_past(now),
                    })
                    .map(|event| event.id.clone())
                    .collect()
            }
        };

        if self.filtered_ids.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.filtered_ids.len() - 1);
        }

        tracing::debug!(filtered_count = self.filtered_ids.len(), "filter applied");
    }

    /// Computes a renderable view model for a screen `rows` lines tall.
    ///
    /// The visible window is centred on the selection and shifted to stay
    /// full near either end of the list.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize) -> UIViewModel {
        let header = self.compute_header();
        let footer = self.compute_footer();
        let search_bar = self.compute_search_bar();
        let notice = self.notice.clone();

        if self.filtered_ids.is_empty() {
            return UIViewModel {
                display_items: vec![],
                selected_index: 0,
                header,
                footer,
                empty_state: Some(self.compute_empty_state()),
                search_bar,
                notice,
            };
        }

        let available_rows = self.calculate_available_rows(rows).max(1);

        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(self.filtered_ids.len());

        let actual_count = visible_end - visible_start;
        if actual_count < available_rows && self.filtered_ids.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let display_items = self.filtered_ids[visible_start..visible_end]
            .iter()
            .enumerate()
            .filter_map(|(relative_idx, id)| {
                self.compute_display_item(id, visible_start + relative_idx)
            })
            .collect();

        UIViewModel {
            display_items,
            selected_index: self.selected_index.saturating_sub(visible_start),
            header,
            footer,
            empty_state: None,
            search_bar,
            notice,
        }
    }

    fn compute_display_item(&self, id: &str, absolute_idx: usize) -> Option<DisplayItem> {
        let is_selected = absolute_idx == self.selected_index;

        if self.view_mode == ViewMode::Events {
            let event = self.events.get(id)?;
            return Some(DisplayItem {
                id: event.id.clone(),
                highlight_ranges: self.compute_highlight_ranges(&event.title),
                name: event.title.clone(),
                detail: format!(
                    "{} {} · {}",
                    event.date_label(),
                    event.time_label(),
                    event.location
                ),
                is_selected,
                is_favorite: false,
                is_syncing: false,
                is_registered: self.registered.contains(id),
            });
        }

        let listing = self.listing_source()?.get(id)?;
        let state = self.favorites.state(id);
        Some(DisplayItem {
            id: listing.id.clone(),
            highlight_ranges: self.compute_highlight_ranges(&listing.name),
            name: listing.name.clone(),
            detail: format!(
                "{} · {} · {}",
                listing.category.label(),
                listing.age_label(),
                listing.status.label()
            ),
            is_selected,
            is_favorite: state.is_favorite,
            is_syncing: state.syncing,
            is_registered: false,
        })
    }

    /// Character ranges of `text` matching the query, case-insensitively.
    ///
    /// Returns no ranges when lower-casing changes the character count, since
    /// the offsets would no longer line up with `text`.
    fn compute_highlight_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        let needle = self.criteria.query.to_lowercase();
        if needle.is_empty() {
            return vec![];
        }

        let haystack = text.to_lowercase();
        if haystack.chars().count() != text.chars().count() {
            return vec![];
        }

        let needle_chars = needle.chars().count();
        haystack
            .match_indices(needle.as_str())
            .map(|(byte_idx, _)| {
                let start = haystack[..byte_idx].chars().count();
                (start, start + needle_chars)
            })
            .collect()
    }

    fn compute_header(&self) -> HeaderInfo {
        let count = self.filtered_ids.len();
        let title = match self.view_mode {
            ViewMode::Animals => match self.criteria.category {
                CategoryFilter::All => format!(" Animals ({count}) "),
                CategoryFilter::Only(category) => format!(" Animals: {} ({count}) ", category.label()),
            },
            ViewMode::Favorites => format!(" Favorites ({count}) "),
            ViewMode::Events => format!(" {} events ({count}) ", self.event_tab.label()),
        };
        HeaderInfo { title }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.input_mode, self.view_mode) {
            (InputMode::Search(SearchFocus::Typing), _) => {
                "esc: exit search  enter: results  type to filter"
            }
            (InputMode::Search(SearchFocus::Navigating), _) => {
                "esc: exit search  /: edit query  j/k: navigate  f: favorite"
            }
            (InputMode::Normal, ViewMode::Animals) => {
                "j/k: navigate  /: search  c: category  f: favorite  a: adopt  e: events  q: quit"
            }
            (InputMode::Normal, ViewMode::Favorites) => {
                "j/k: navigate  /: search  f: favorite  h: animals  q: quit"
            }
            (InputMode::Normal, ViewMode::Events) => {
                "j/k: navigate  /: search  t: tab  r: register  h: animals  q: quit"
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        matches!(self.input_mode, InputMode::Search(_)).then(|| SearchBarInfo {
            query: self.criteria.query.clone(),
            category: self.criteria.category,
        })
    }

    fn compute_empty_state(&self) -> EmptyState {
        let loaded = match self.view_mode {
            ViewMode::Animals => self.listings.is_loaded(),
            ViewMode::Favorites => self.favorite_listings.is_loaded(),
            ViewMode::Events => self.events.is_loaded(),
        };

        if !loaded {
            return EmptyState {
                message: "Loading...".to_string(),
                subtitle: String::new(),
            };
        }

        let message = match self.view_mode {
            ViewMode::Animals => "No animals found",
            ViewMode::Favorites => "No favorites yet",
            ViewMode::Events => match self.event_tab {
                EventTab::Upcoming => "No upcoming events",
                EventTab::Past => "No past events",
            },
        };
        let subtitle = if self.criteria.is_unfiltered() {
            ""
        } else {
            "Try a different search or category"
        };

        EmptyState {
            message: message.to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    /// Rows left for the list after header, footer and search bar.
    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.input_mode {
            InputMode::Normal => total_rows.saturating_sub(4),
            InputMode::Search(_) => total_rows.saturating_sub(6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use chrono::Duration;

    fn state() -> AppState {
        let mut state = AppState::new();
        state.listings = CatalogStore::from_fetch(vec![
            Listing::new("1", Category::Dog, "Max", "Friendly"),
            Listing::new("2", Category::Cat, "Luna", "Calm"),
            Listing::new("3", Category::Dog, "Bella", "Sleeps with Luna"),
        ]);
        state.apply_filter();
        state
    }

    fn event(id: &str, title: &str, date: DateTime<Utc>) -> ShelterEvent {
        ShelterEvent {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            date,
            location: "Park".into(),
            image_url: String::new(),
            attendees: None,
            created_by: "admin".into(),
        }
    }

    #[test]
    fn selection_wraps() {
        let mut state = state();
        state.move_selection_up();
        assert_eq!(state.selected_id(), Some("3"));
        state.move_selection_down();
        assert_eq!(state.selected_id(), Some("1"));
    }

    #[test]
    fn narrowing_clamps_selection() {
        let mut state = state();
        state.selected_index = 2;
        state.criteria.category = CategoryFilter::Only(Category::Cat);
        state.apply_filter();
        assert_eq!(state.selected_index, 0);
        assert_eq!(state.selected_listing().map(|l| l.name.as_str()), Some("Luna"));
    }

    #[test]
    fn events_partition_by_tab() {
        let now = Utc::now();
        let mut state = AppState::new();
        state.view_mode = ViewMode::Events;
        state.events = CatalogStore::from_fetch(vec![
            event("a", "Fair", now + Duration::days(1)),
            event("b", "Workshop", now - Duration::days(1)),
            event("c", "Exactly now", now),
        ]);

        state.apply_filter_at(now);
        assert_eq!(state.filtered_ids, vec!["a"]);

        state.event_tab = EventTab::Past;
        state.apply_filter_at(now);
        assert_eq!(state.filtered_ids, vec!["b", "c"]);

        state.criteria.query = "WORK".into();
        state.apply_filter_at(now);
        assert_eq!(state.filtered_ids, vec!["b"]);
        assert_eq!(state.visible_events().len(), 1);
        assert!(state.visible_listings().is_empty());
    }

    #[test]
    fn category_does_not_hide_events() {
        let now = Utc::now();
        let mut state = AppState::new();
        state.view_mode = ViewMode::Events;
        state.criteria.category = CategoryFilter::Only(Category::Dog);
        state.events = CatalogStore::from_fetch(vec![event("a", "Fair", now + Duration::days(1))]);
        state.apply_filter_at(now);
        assert_eq!(state.filtered_ids, vec!["a"]);
    }

    #[test]
    fn viewmodel_windows_around_selection() {
        let mut state = AppState::new();
        state.listings = CatalogStore::from_fetch(
            (0..20)
                .map(|i| Listing::new(i.to_string(), Category::Other, format!("Pet {i}"), ""))
                .collect(),
        );
        state.apply_filter();
        state.selected_index = 19;

        let vm = state.compute_viewmodel(10);
        assert_eq!(vm.display_items.len(), 6);
        assert_eq!(vm.display_items.last().map(|i| i.id.as_str()), Some("19"));
        assert!(vm.display_items[vm.selected_index].is_selected);
    }

    #[test]
    fn viewmodel_highlights_query_in_name() {
        let mut state = state();
        state.criteria.query = "lun".into();
        state.apply_filter();
        let vm = state.compute_viewmodel(24);
        let ids: Vec<&str> = vm.display_items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert_eq!(vm.display_items[0].highlight_ranges, vec![(0, 3)]);
        assert!(vm.display_items[1].highlight_ranges.is_empty());
    }

    #[test]
    fn empty_state_distinguishes_loading() {
        let state = AppState::new();
        let vm = state.compute_viewmodel(24);
        assert_eq!(vm.empty_state.map(|e| e.message), Some("Loading...".to_string()));

        let mut state = self::state();
        state.criteria.query = "zzz".into();
        state.apply_filter();
        let empty = state.compute_viewmodel(24).empty_state.unwrap();
        assert_eq!(empty.message, "No animals found");
        assert!(!empty.subtitle.is_empty());
    }
}

//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They hold
//! display-ready data only: formatted labels, selection and favorite flags,
//! and pre-computed highlight ranges.
//!
//! # Example
//!
//! ```rust
//! use shelter::catalog::CategoryFilter;
//! use shelter::ui::viewmodel::{DisplayItem, FooterInfo, HeaderInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     display_items: vec![DisplayItem {
//!         id: "2".to_string(),
//!         name: "Luna".to_string(),
//!         detail: "Cat · 1 year · Available".to_string(),
//!         is_selected: true,
//!         is_favorite: false,
//!         is_syncing: false,
//!         is_registered: false,
//!         highlight_ranges: vec![(0, 2)],
//!     }],
//!     selected_index: 0,
//!     header: HeaderInfo { title: " Animals (1) ".to_string() },
//!     footer: FooterInfo { keybindings: "q: quit".to_string() },
//!     empty_state: None,
//!     search_bar: None,
//!     notice: None,
//! };
//! assert_eq!(vm.display_items.len(), 1);
//! ```

use crate::catalog::CategoryFilter;

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Rows in the visible window.
    pub display_items: Vec<DisplayItem>,

    /// Index of the selected row within `display_items`.
    pub selected_index: usize,

    pub header: HeaderInfo,
    pub footer: FooterInfo,

    /// Set instead of rows when nothing is visible.
    pub empty_state: Option<EmptyState>,

    /// Present while in search mode.
    pub search_bar: Option<SearchBarInfo>,

    /// Transient notice, such as a failed favorite sync.
    pub notice: Option<String>,
}

/// Display information for one listing or event row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: String,

    /// Animal name or event title.
    pub name: String,

    /// Secondary column: category, age and status for animals; date, time
    /// and location for events.
    pub detail: String,

    pub is_selected: bool,
    pub is_favorite: bool,

    /// A favorite write for this row is in flight.
    pub is_syncing: bool,

    /// The signed-in user is registered (events only).
    pub is_registered: bool,

    /// Character ranges of `name` matching the query.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No animals found").
    pub message: String,

    /// Secondary hint, empty when there is nothing to suggest.
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub category: CategoryFilter,
}

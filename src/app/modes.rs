//! Input and view mode state types for the application.
//!
//! The application is in one of two input modes:
//! - **Normal**: navigation and commands
//! - **Search**: query editing, with typing or result-navigation focus
//!
//! View modes pick which collection is on screen:
//! - **Animals**: the adoption catalog, filtered by category and query
//! - **Events**: shelter events on the selected [`EventTab`], filtered by query
//! - **Favorites**: the signed-in user's favorited animals
//!
//! # Example
//!
//! ```rust
//! use shelter::app::modes::{EventTab, InputMode, SearchFocus, ViewMode};
//!
//! let input_mode = InputMode::Search(SearchFocus::Typing);
//! let view_mode = ViewMode::Events;
//! assert_eq!(EventTab::default(), EventTab::Upcoming);
//! ```

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// User is typing in the search input field.
    Typing,

    /// User is navigating through filtered results.
    Navigating,
}

/// Current input handling mode.
///
/// Controls how character input is interpreted and whether the search bar
/// is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Default navigation and command mode.
    #[default]
    Normal,

    /// Active search mode with focus state.
    Search(SearchFocus),
}

/// Which collection the screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Adoptable animals. Header displays "Animals".
    #[default]
    Animals,

    /// Shelter events. Header displays the active tab.
    Events,

    /// The user's favorites, fetched separately from the catalog.
    Favorites,
}

/// Event partition relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventTab {
    /// Events dated strictly after now.
    #[default]
    Upcoming,

    /// Events dated now or earlier.
    Past,
}

impl EventTab {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Past => "Past",
        }
    }
}

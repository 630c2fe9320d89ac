//! Application layer coordinating state, events, and actions.
//!
//! Sits between the runtime (the shell binary) and the
//! domain/catalog/storage/worker layers.
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──── Worker Responses / Auth ─────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`favorite`]: Optimistic favorite flags with confirm-or-rollback
//! - [`forms`]: Sign-in, sign-up and listing forms with presence checks
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Input, view and event-tab state types
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod favorite;
pub mod forms;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use favorite::{toggle, FavoriteState, Favorites, Tentative};
pub use forms::{LoginForm, NewListingForm, SignUpForm};
pub use handler::{handle_event, Event};
pub use modes::{EventTab, InputMode, SearchFocus, ViewMode};
pub use state::{AppState, Detail};

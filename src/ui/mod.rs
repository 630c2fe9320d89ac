//! Text rendering for the shell binary.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → text lines
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Writes a view model as plain text

pub mod renderer;
pub mod viewmodel;

pub use renderer::{highlight, render, render_detail, render_viewmodel};
pub use viewmodel::{DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, UIViewModel};

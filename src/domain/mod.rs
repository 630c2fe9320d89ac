//! Domain layer for the shelter catalog.
//!
//! Core types independent of storage, workers or rendering:
//!
//! - [`error`]: Error taxonomy and result alias
//! - [`listing`]: Adoptable animals, categories and adoption status
//! - [`event`]: Shelter events
//! - [`identity`]: The signed-in user
//!
//! # Examples
//!
//! ```
//! use shelter::domain::{Category, Listing, Result};
//!
//! fn register() -> Result<Listing> {
//!     Ok(Listing::new("1", Category::Dog, "Max", "Friendly and playful"))
//! }
//! ```

pub mod error;
pub mod event;
pub mod identity;
pub mod listing;

pub use error::{AuthError, FormField, Result, ShelterError, ValidationError};
pub use event::ShelterEvent;
pub use identity::Identity;
pub use listing::{AdoptionStatus, Category, Listing};

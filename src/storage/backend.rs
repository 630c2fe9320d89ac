//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait: the persistence collaborator the
//! worker calls for every catalog read and every favorite, status or
//! registration write. Each method maps directly to one worker message.

use crate::domain::error::Result;
use crate::domain::{AdoptionStatus, Listing, ShelterEvent};
use crate::storage::models::NewListing;

/// Abstraction over persistent storage backends.
///
/// # Implementations
///
/// - [`MemoryStorage`](crate::storage::MemoryStorage): seeded, process-local
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```
/// use shelter::storage::{MemoryStorage, Storage};
///
/// let mut storage = MemoryStorage::seeded();
/// storage.set_favorite("user-1", "2", true)?;
/// assert!(storage.is_favorite("2", "user-1")?);
/// # Ok::<(), shelter::ShelterError>(())
/// ```
pub trait Storage: Send {
    /// Bulk read of every animal listing, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn fetch_listings(&self) -> Result<Vec<Listing>>;

    /// Retrieves a single listing. Returns `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn fetch_listing_by_id(&self, id: &str) -> Result<Option<Listing>>;

    /// Advances a listing along `available → pending → adopted`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing is unknown, the transition is not a
    /// forward step, or the write fails.
    fn set_listing_status(&mut self, id: &str, status: AdoptionStatus) -> Result<()>;

    /// Stores a new listing and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn add_listing(&mut self, submission: NewListing, created_by: &str) -> Result<Listing>;

    /// Persists a user's favorite flag for a listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing is unknown or the write fails.
    fn set_favorite(&mut self, user_id: &str, listing_id: &str, is_favorite: bool) -> Result<()>;

    /// Returns whether `user_id` has favorited `listing_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn is_favorite(&self, listing_id: &str, user_id: &str) -> Result<bool>;

    /// Ids of every listing the user has favorited, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn favorite_ids(&self, user_id: &str) -> Result<Vec<String>>;

    /// Bulk read of every shelter event.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn fetch_events(&self) -> Result<Vec<ShelterEvent>>;

    /// Retrieves a single event. Returns `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn fetch_event_by_id(&self, id: &str) -> Result<Option<ShelterEvent>>;

    /// Registers a user for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is unknown or the write fails.
    fn register_for_event(&mut self, event_id: &str, user_id: &str) -> Result<()>;

    /// Returns whether `user_id` is registered for `event_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn is_registered(&self, event_id: &str, user_id: &str) -> Result<bool>;
}

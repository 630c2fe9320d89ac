//! Process-local storage backend.
//!
//! Holds a [`StorageData`] in memory and nothing else. Used by tests, by the
//! shell when no data directory is configured, and as the stand-in for the
//! hosted backend the mobile screens talk to.

use crate::domain::error::Result;
use crate::domain::{AdoptionStatus, Listing, ShelterEvent};
use crate::storage::backend::Storage;
use crate::storage::data::StorageData;
use crate::storage::models::NewListing;
use crate::storage::seed;

/// In-memory storage backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: StorageData,
}

impl MemoryStorage {
    /// Empty storage: no listings, no events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage preloaded with the starter catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_data(seed::starter_data())
    }

    #[must_use]
    pub const fn with_data(data: StorageData) -> Self {
        Self { data }
    }

    /// Snapshot of everything stored, for assertions and export.
    #[must_use]
    pub const fn data(&self) -> &StorageData {
        &self.data
    }
}

impl Storage for MemoryStorage {
    fn fetch_listings(&self) -> Result<Vec<Listing>> {
        Ok(self.data.listings.clone())
    }

    fn fetch_listing_by_id(&self, id: &str) -> Result<Option<Listing>> {
        Ok(self.data.listing(id).cloned())
    }

    fn set_listing_status(&mut self, id: &str, status: AdoptionStatus) -> Result<()> {
        tracing::debug!(listing_id = %id, status = %status, "updating listing status");
        self.data.set_listing_status(id, status)
    }

    fn add_listing(&mut self, submission: NewListing, created_by: &str) -> Result<Listing> {
        let listing = self.data.add_listing(submission, created_by);
        tracing::debug!(listing_id = %listing.id, "listing added");
        Ok(listing)
    }

    fn set_favorite(&mut self, user_id: &str, listing_id: &str, is_favorite: bool) -> Result<()> {
        tracing::debug!(listing_id = %listing_id, is_favorite = is_favorite, "setting favorite");
        self.data.set_favorite(user_id, listing_id, is_favorite)
    }

    fn is_favorite(&self, listing_id: &str, user_id: &str) -> Result<bool> {
        Ok(self.data.is_favorite(listing_id, user_id))
    }

    fn favorite_ids(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(self.data.favorite_ids(user_id))
    }

    fn fetch_events(&self) -> Result<Vec<ShelterEvent>> {
        Ok(self.data.events.clone())
    }

    fn fetch_event_by_id(&self, id: &str) -> Result<Option<ShelterEvent>> {
        Ok(self.data.event(id).cloned())
    }

    fn register_for_event(&mut self, event_id: &str, user_id: &str) -> Result<()> {
        tracing::debug!(event_id = %event_id, "registering for event");
        self.data.register_for_event(event_id, user_id)
    }

    fn is_registered(&self, event_id: &str, user_id: &str) -> Result<bool> {
        Ok(self.data.is_registered(event_id, user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    #[test]
    fn seeded_storage_has_starter_catalog() {
        let storage = MemoryStorage::seeded();
        let listings = storage.fetch_listings().unwrap();
        let names: Vec<&str> = listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Max", "Luna", "Bob", "Bella"]);
        assert_eq!(storage.fetch_events().unwrap().len(), 3);
    }

    #[test]
    fn favorites_are_deterministic() {
        let mut storage = MemoryStorage::seeded();
        assert!(!storage.is_favorite("1", "u1").unwrap());
        storage.set_favorite("u1", "1", true).unwrap();
        for _ in 0..10 {
            assert!(storage.is_favorite("1", "u1").unwrap());
        }
    }

    #[test]
    fn registration_is_idempotent_and_counts_once() {
        let mut storage = MemoryStorage::seeded();
        storage.register_for_event("1", "u1").unwrap();
        storage.register_for_event("1", "u1").unwrap();
        let event = storage.fetch_event_by_id("1").unwrap().unwrap();
        assert_eq!(event.attendees, Some(35));
        assert!(storage.is_registered("1", "u1").unwrap());
        assert!(!storage.is_registered("2", "u1").unwrap());
    }

    #[test]
    fn added_listing_is_available_with_fresh_id() {
        let mut storage = MemoryStorage::new();
        let listing = storage
            .add_listing(
                NewListing {
                    name: "Rex".into(),
                    age_months: 3,
                    category: Category::Dog,
                    description: "Puppy".into(),
                    images: vec!["rex.jpg".into()],
                },
                "u9",
            )
            .unwrap();
        assert!(listing.is_available());
        assert!(!listing.id.is_empty());
        assert_eq!(
            storage.fetch_listing_by_id(&listing.id).unwrap(),
            Some(listing)
        );
    }
}

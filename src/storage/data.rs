//! Shared in-memory dataset behind every storage backend.
//!
//! [`StorageData`] is both the working set of [`MemoryStorage`] and the
//! top-level document [`JsonStorage`] serializes to disk, so the two backends
//! differ only in whether mutations are flushed to a file.
//!
//! [`MemoryStorage`]: crate::storage::MemoryStorage
//! [`JsonStorage`]: crate::storage::JsonStorage

use crate::domain::error::{Result, ShelterError};
use crate::domain::{AdoptionStatus, Listing, ShelterEvent};
use crate::storage::models::NewListing;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Current version of the storage document format.
pub const STORAGE_VERSION: u32 = 1;

/// Catalog, events, favorites and registrations in one document.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "listings": [{ "id": "1", "category": "dog", "name": "Max", ... }],
///   "events": [{ "id": "1", "title": "Adoption fair", ... }],
///   "favorites": { "user-1": ["1", "4"] },
///   "registrations": { "1": ["user-1"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageData {
    /// Version of the storage format for future migrations.
    pub version: u32,

    /// Animal listings in catalog order.
    #[serde(default)]
    pub listings: Vec<Listing>,

    /// Shelter events in publication order.
    #[serde(default)]
    pub events: Vec<ShelterEvent>,

    /// Favorite listing ids keyed by user id.
    #[serde(default)]
    pub favorites: BTreeMap<String, BTreeSet<String>>,

    /// Registered user ids keyed by event id.
    #[serde(default)]
    pub registrations: BTreeMap<String, BTreeSet<String>>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            listings: Vec::new(),
            events: Vec::new(),
            favorites: BTreeMap::new(),
            registrations: BTreeMap::new(),
        }
    }
}

impl StorageData {
    #[must_use]
    pub fn with_catalog(listings: Vec<Listing>, events: Vec<ShelterEvent>) -> Self {
        Self {
            listings,
            events,
            ..Self::default()
        }
    }

    pub(crate) fn listing(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub(crate) fn event(&self, id: &str) -> Option<&ShelterEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Advances a listing's adoption status.
    ///
    /// # Errors
    ///
    /// [`ShelterError::NotFound`] for an unknown id and
    /// [`ShelterError::InvalidTransition`] for anything but a forward step.
    pub(crate) fn set_listing_status(&mut self, id: &str, status: AdoptionStatus) -> Result<()> {
        let listing = self
            .listings
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| ShelterError::NotFound(format!("listing {id}")))?;

        if !listing.status.can_transition_to(status) {
            return Err(ShelterError::InvalidTransition {
                from: listing.status,
                to: status,
            });
        }

        listing.status = status;
        Ok(())
    }

    pub(crate) fn add_listing(&mut self, submission: NewListing, created_by: &str) -> Listing {
        let listing = submission.into_listing(created_by);
        self.listings.push(listing.clone());
        listing
    }

    /// Records whether `user_id` favorites `listing_id`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ShelterError::NotFound`] if the listing does not exist.
    pub(crate) fn set_favorite(
        &mut self,
        user_id: &str,
        listing_id: &str,
        is_favorite: bool,
    ) -> Result<()> {
        if self.listing(listing_id).is_none() {
            return Err(ShelterError::NotFound(format!("listing {listing_id}")));
        }

        if is_favorite {
            self.favorites
                .entry(user_id.to_string())
                .or_default()
                .insert(listing_id.to_string());
        } else if let Some(ids) = self.favorites.get_mut(user_id) {
            ids.remove(listing_id);
            if ids.is_empty() {
                self.favorites.remove(user_id);
            }
        }
        Ok(())
    }

    pub(crate) fn is_favorite(&self, listing_id: &str, user_id: &str) -> bool {
        self.favorites
            .get(user_id)
            .is_some_and(|ids| ids.contains(listing_id))
    }

    /// Favorite ids for a user, in catalog order.
    pub(crate) fn favorite_ids(&self, user_id: &str) -> Vec<String> {
        self.listings
            .iter()
            .filter(|l| self.is_favorite(&l.id, user_id))
            .map(|l| l.id.clone())
            .collect()
    }

    /// Registers a user for an event. Re-registering is a no-op.
    ///
    /// A first registration bumps the published attendee count.
    ///
    /// # Errors
    ///
    /// Returns [`ShelterError::NotFound`] if the event does not exist.
    pub(crate) fn register_for_event(&mut self, event_id: &str, user_id: &str) -> Result<()> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| ShelterError::NotFound(format!("event {event_id}")))?;

        let newly_registered = self
            .registrations
            .entry(event_id.to_string())
            .or_default()
            .insert(user_id.to_string());

        if newly_registered {
            event.attendees = Some(event.attendees.unwrap_or(0).saturating_add(1));
        }
        Ok(())
    }

    pub(crate) fn is_registered(&self, event_id: &str, user_id: &str) -> bool {
        self.registrations
            .get(event_id)
            .is_some_and(|users| users.contains(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn data() -> StorageData {
        StorageData::with_catalog(
            vec![
                Listing::new("1", Category::Dog, "Max", ""),
                Listing::new("2", Category::Cat, "Luna", ""),
                Listing::new("3", Category::Other, "Bob", ""),
            ],
            vec![],
        )
    }

    #[test]
    fn favorites_come_back_in_catalog_order() {
        let mut d = data();
        d.set_favorite("u1", "3", true).unwrap();
        d.set_favorite("u1", "1", true).unwrap();
        assert_eq!(d.favorite_ids("u1"), vec!["1", "3"]);
        assert!(d.favorite_ids("u2").is_empty());
    }

    #[test]
    fn unfavoriting_last_listing_drops_user_entry() {
        let mut d = data();
        d.set_favorite("u1", "2", true).unwrap();
        d.set_favorite("u1", "2", false).unwrap();
        assert!(!d.is_favorite("2", "u1"));
        assert!(d.favorites.is_empty());
    }

    #[test]
    fn favoriting_unknown_listing_fails() {
        let mut d = data();
        assert!(matches!(
            d.set_favorite("u1", "404", true),
            Err(ShelterError::NotFound(_))
        ));
    }

    #[test]
    fn status_only_moves_forward() {
        let mut d = data();
        d.set_listing_status("1", AdoptionStatus::Pending).unwrap();
        let err = d.set_listing_status("1", AdoptionStatus::Available).unwrap_err();
        assert!(matches!(
            err,
            ShelterError::InvalidTransition {
                from: AdoptionStatus::Pending,
                to: AdoptionStatus::Available
            }
        ));
        d.set_listing_status("1", AdoptionStatus::Adopted).unwrap();
        assert_eq!(d.listing("1").unwrap().status, AdoptionStatus::Adopted);
    }
}

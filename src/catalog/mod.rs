//! Catalog snapshot and filter engine.
//!
//! - `store`: [`CatalogStore`], the read-only snapshot fetched per screen
//! - `filter`: [`filter`] and [`FilterCriteria`], the pure subset derivation
//!
//! Both work over any [`CatalogItem`], which is implemented for animal
//! [`Listing`]s and [`ShelterEvent`]s.

pub mod filter;
pub mod store;

pub use filter::{filter, matching, CategoryFilter, FilterCriteria};
pub use store::CatalogStore;

use crate::domain::{Category, Listing, ShelterEvent};

/// An item the catalog can hold and the filter engine can match.
pub trait CatalogItem {
    /// Unique id within a catalog snapshot.
    fn id(&self) -> &str;

    /// Species bucket, or `None` for items that have no category.
    fn category(&self) -> Option<Category>;

    /// Free-text fields searched by the query predicate.
    fn search_fields(&self) -> Vec<&str>;
}

impl CatalogItem for Listing {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> Option<Category> {
        Some(self.category)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl CatalogItem for ShelterEvent {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> Option<Category> {
        None
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.location.as_str(),
        ]
    }
}

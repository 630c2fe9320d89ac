//! Storage record models for the persistence layer.
//!
//! These are the payloads the storage collaborators accept that are not
//! themselves domain objects yet, such as a validated listing submission that
//! has no id until storage assigns one.

use crate::domain::{AdoptionStatus, Category, Listing};
use serde::{Deserialize, Serialize};

/// A validated animal submission, ready to be stored.
///
/// Produced by [`NewListingForm::validate`](crate::app::forms::NewListingForm::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub name: String,
    pub age_months: u32,
    pub category: Category,
    pub description: String,
    pub images: Vec<String>,
}

impl NewListing {
    /// Turns the submission into a stored listing.
    ///
    /// Assigns a fresh UUID v4 id, `available` status and the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelter::domain::{AdoptionStatus, Category};
    /// use shelter::storage::NewListing;
    ///
    /// let submission = NewListing {
    ///     name: "Rex".into(),
    ///     age_months: 24,
    ///     category: Category::Dog,
    ///     description: "Calm".into(),
    ///     images: vec!["rex.jpg".into()],
    /// };
    /// let listing = submission.into_listing("user-1");
    /// assert_eq!(listing.status, AdoptionStatus::Available);
    /// assert_eq!(listing.created_by, "user-1");
    /// ```
    #[must_use]
    pub fn into_listing(self, created_by: &str) -> Listing {
        Listing {
            id: uuid::Uuid::new_v4().to_string(),
            category: self.category,
            name: self.name,
            description: self.description,
            status: AdoptionStatus::Available,
            age_months: self.age_months,
            images: self.images,
            created_by: created_by.to_string(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

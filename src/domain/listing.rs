//! Animal listing domain model.
//!
//! A [`Listing`] is one adoptable animal as surfaced in the catalog. Listings
//! are immutable once fetched for a screen session; the only lifecycle they
//! have is their [`AdoptionStatus`], which the storage collaborator advances.

use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of months in one year.
const MONTHS_PER_YEAR: u32 = 12;

/// Species bucket used by the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Dog,
    Cat,
    Other,
}

impl Category {
    /// Every category, in the order the category bar shows them.
    pub const ALL: [Self; 3] = [Self::Dog, Self::Cat, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Other => "other",
        }
    }

    /// Plural label for category chips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dog => "Dogs",
            Self::Cat => "Cats",
            Self::Other => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dog" => Ok(Self::Dog),
            "cat" => Ok(Self::Cat),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::UnknownCategory(s.to_string())),
        }
    }
}

/// Where a listing is in the adoption workflow.
///
/// The only legal moves are `Available → Pending` (someone requested the
/// adoption) and `Pending → Adopted` (the shelter completed it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionStatus {
    Available,
    Pending,
    Adopted,
}

impl AdoptionStatus {
    /// Returns `true` if moving from `self` to `next` is a legal transition.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelter::domain::AdoptionStatus;
    ///
    /// assert!(AdoptionStatus::Available.can_transition_to(AdoptionStatus::Pending));
    /// assert!(!AdoptionStatus::Adopted.can_transition_to(AdoptionStatus::Available));
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Pending) | (Self::Pending, Self::Adopted)
        )
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Pending => "In progress",
            Self::Adopted => "Adopted",
        }
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Adopted => "adopted",
        };
        f.write_str(s)
    }
}

/// An adoptable animal.
///
/// # Fields
///
/// - `id`: Unique identifier assigned by storage
/// - `category`: Species bucket used by the category filter
/// - `name`, `description`: Free text searched by the query filter
/// - `status`: Adoption workflow position
/// - `age_months`: Age in whole months
/// - `images`: Photo URLs, first one is the card cover
/// - `created_by`: User id of whoever registered the animal
/// - `created_at`: Unix timestamp of registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub category: Category,
    pub name: String,
    pub description: String,
    pub status: AdoptionStatus,
    #[serde(default)]
    pub age_months: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Listing {
    /// Creates an available listing with no photos, created now.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelter::domain::{AdoptionStatus, Category, Listing};
    ///
    /// let max = Listing::new("1", Category::Dog, "Max", "A playful dog");
    /// assert_eq!(max.status, AdoptionStatus::Available);
    /// assert!(max.images.is_empty());
    /// ```
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        category: Category,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            name: name.into(),
            description: description.into(),
            status: AdoptionStatus::Available,
            age_months: 0,
            images: Vec::new(),
            created_by: String::new(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == AdoptionStatus::Available
    }

    /// Returns a human-readable age.
    ///
    /// - Under a year: "N month(s)"
    /// - Whole years: "N year(s)"
    /// - Otherwise: "N year(s) and M month(s)"
    ///
    /// # Examples
    ///
    /// ```
    /// use shelter::domain::{Category, Listing};
    ///
    /// let mut luna = Listing::new("2", Category::Cat, "Luna", "");
    /// luna.age_months = 1;
    /// assert_eq!(luna.age_label(), "1 month");
    /// luna.age_months = 24;
    /// assert_eq!(luna.age_label(), "2 years");
    /// luna.age_months = 18;
    /// assert_eq!(luna.age_label(), "1 year and 6 months");
    /// ```
    #[must_use]
    pub fn age_label(&self) -> String {
        let months = self.age_months;
        if months < MONTHS_PER_YEAR {
            return plural(months, "month", "months");
        }

        let years = months / MONTHS_PER_YEAR;
        let rest = months % MONTHS_PER_YEAR;
        if rest == 0 {
            plural(years, "year", "years")
        } else {
            format!(
                "{} and {}",
                plural(years, "year", "years"),
                plural(rest, "month", "months")
            )
        }
    }
}

fn plural(n: u32, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("DOG".parse::<Category>().unwrap(), Category::Dog);
        assert_eq!(" cat ".parse::<Category>().unwrap(), Category::Cat);
        assert_eq!(
            "bird".parse::<Category>(),
            Err(ValidationError::UnknownCategory("bird".to_string()))
        );
    }

    #[test]
    fn only_forward_transitions_are_legal() {
        use AdoptionStatus::*;
        assert!(Available.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Adopted));
        assert!(!Available.can_transition_to(Adopted));
        assert!(!Pending.can_transition_to(Available));
        assert!(!Adopted.can_transition_to(Pending));
        assert!(!Available.can_transition_to(Available));
    }

    #[test]
    fn age_label_under_a_year() {
        let mut l = Listing::new("1", Category::Dog, "Max", "");
        l.age_months = 0;
        assert_eq!(l.age_label(), "0 months");
        l.age_months = 11;
        assert_eq!(l.age_label(), "11 months");
    }

    #[test]
    fn age_label_years_and_months() {
        let mut l = Listing::new("1", Category::Dog, "Max", "");
        l.age_months = 12;
        assert_eq!(l.age_label(), "1 year");
        l.age_months = 25;
        assert_eq!(l.age_label(), "2 years and 1 month");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&AdoptionStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}

//! Category and free-text filtering over a catalog snapshot.
//!
//! The filter is a pure function of its inputs: it never reorders, duplicates
//! or synthesizes items, so its output is always an order-preserving subset
//! of the catalog it was given.

use crate::catalog::CatalogItem;
use crate::domain::{Category, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category selector: everything, or one species bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Returns `true` if an item with the given category passes.
    ///
    /// Items without a category (events) only pass [`CategoryFilter::All`].
    #[must_use]
    pub fn admits(self, category: Option<Category>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => category == Some(wanted),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Inputs to the filter engine, owned by the screen controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub category: CategoryFilter,
    pub query: String,
}

impl FilterCriteria {
    #[must_use]
    pub fn new(category: CategoryFilter, query: impl Into<String>) -> Self {
        Self {
            category,
            query: query.into(),
        }
    }

    /// Criteria that pass every item.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.category == CategoryFilter::All && self.query.is_empty()
    }

    /// Returns `true` if `item` passes both the category and the query predicate.
    ///
    /// `needle` must be the already lower-cased query.
    fn admits<T: CatalogItem>(&self, item: &T, needle: &str) -> bool {
        if !self.category.admits(item.category()) {
            return false;
        }
        needle.is_empty()
            || item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Iterates over the items that pass `criteria`, in catalog order.
pub fn matching<'a, T: CatalogItem>(
    items: &'a [T],
    criteria: &'a FilterCriteria,
) -> impl Iterator<Item = &'a T> + 'a {
    let needle = criteria.query.to_lowercase();
    items
        .iter()
        .filter(move |item| criteria.admits(*item, &needle))
}

/// Returns the subset of `items` passing `criteria`, preserving order.
///
/// # Examples
///
/// ```
/// use shelter::catalog::{filter, CategoryFilter, FilterCriteria};
/// use shelter::domain::{Category, Listing};
///
/// let catalog = vec![
///     Listing::new("1", Category::Dog, "Max", "Loves fetch"),
///     Listing::new("2", Category::Cat, "Luna", "Sleeps all day"),
/// ];
///
/// let cats = filter(&catalog, &FilterCriteria::new(CategoryFilter::Only(Category::Cat), ""));
/// assert_eq!(cats.len(), 1);
/// assert_eq!(cats[0].id, "2");
/// ```
#[must_use]
pub fn filter<T: CatalogItem + Clone>(items: &[T], criteria: &FilterCriteria) -> Vec<T> {
    matching(items, criteria).cloned().collect()
}

//! Shelter event domain model.
//!
//! Events (adoption fairs, vaccination drives, workshops) are listed next to
//! the animal catalog. They have no adoption workflow; the only derived
//! property is whether they are upcoming or already past.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled shelter event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelterEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    /// Head count shown on the card, if the organizer published one.
    #[serde(default)]
    pub attendees: Option<u32>,
    #[serde(default)]
    pub created_by: String,
}

impl ShelterEvent {
    /// An event is past once its start time is at or before `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use shelter::domain::ShelterEvent;
    ///
    /// let now = Utc::now();
    /// let fair = ShelterEvent {
    ///     id: "1".into(),
    ///     title: "Adoption fair".into(),
    ///     description: String::new(),
    ///     date: now - Duration::days(1),
    ///     location: "City park".into(),
    ///     image_url: String::new(),
    ///     attendees: None,
    ///     created_by: "admin".into(),
    /// };
    /// assert!(fair.is_past(now));
    /// ```
    #[must_use]
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date <= now
    }

    #[must_use]
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        !self.is_past(now)
    }

    /// Date formatted as `dd/mm/yyyy`.
    #[must_use]
    pub fn date_label(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// Start time formatted as `HH:MM`.
    #[must_use]
    pub fn time_label(&self) -> String {
        self.date.format("%H:%M").to_string()
    }
}

//! Starter catalog used when no persisted data exists yet.

use crate::domain::{AdoptionStatus, Category, Listing, ShelterEvent};
use crate::storage::data::StorageData;
use chrono::{DateTime, Duration, Utc};

#[allow(clippy::too_many_arguments)]
fn animal(
    id: &str,
    name: &str,
    age_months: u32,
    category: Category,
    status: AdoptionStatus,
    created_by: &str,
    image: &str,
    description: &str,
) -> Listing {
    Listing {
        id: id.to_string(),
        category,
        name: name.to_string(),
        description: description.to_string(),
        status,
        age_months,
        images: vec![image.to_string()],
        created_by: created_by.to_string(),
        created_at: Utc::now().timestamp(),
    }
}

/// The four animals the shelter launches with.
#[must_use]
pub fn listings() -> Vec<Listing> {
    vec![
        animal(
            "1",
            "Max",
            24,
            Category::Dog,
            AdoptionStatus::Available,
            "user1",
            "https://images.pexels.com/photos/1805164/pexels-photo-1805164.jpeg",
            "Max is a very friendly and playful dog. He loves running around and chasing balls.",
        ),
        animal(
            "2",
            "Luna",
            12,
            Category::Cat,
            AdoptionStatus::Available,
            "user1",
            "https://images.pexels.com/photos/2061057/pexels-photo-2061057.jpeg",
            "Luna is an affectionate, gentle cat. She loves napping on laps and being petted.",
        ),
        animal(
            "3",
            "Bob",
            36,
            Category::Other,
            AdoptionStatus::Available,
            "user2",
            "https://images.pexels.com/photos/326012/pexels-photo-326012.jpeg",
            "Bob is a calm and quiet rabbit. He is great for apartments.",
        ),
        animal(
            "4",
            "Bella",
            18,
            Category::Dog,
            AdoptionStatus::Adopted,
            "user3",
            "https://images.pexels.com/photos/2023384/pexels-photo-2023384.jpeg",
            "Bella is a sweet, obedient dog. She is already house-trained.",
        ),
    ]
}

/// Two upcoming events and one past one, dated relative to `now`.
#[must_use]
pub fn events(now: DateTime<Utc>) -> Vec<ShelterEvent> {
    vec![
        ShelterEvent {
            id: "1".to_string(),
            title: "Adoption Fair".to_string(),
            description: "Come meet our animals and maybe find a new friend for life!".to_string(),
            date: now + Duration::days(7),
            location: "City Park".to_string(),
            image_url: "https://images.pexels.com/photos/7788657/pexels-photo-7788657.jpeg"
                .to_string(),
            attendees: Some(34),
            created_by: "admin".to_string(),
        },
        ShelterEvent {
            id: "2".to_string(),
            title: "Vaccination Drive".to_string(),
            description: "Bring your pet for free vaccines and a veterinary check-up.".to_string(),
            date: now + Duration::days(14),
            location: "Faithful Friend Veterinary Clinic, 1000 Main Ave".to_string(),
            image_url: "https://images.pexels.com/photos/6235945/pexels-photo-6235945.jpeg"
                .to_string(),
            attendees: Some(18),
            created_by: "admin".to_string(),
        },
        ShelterEvent {
            id: "3".to_string(),
            title: "Workshop: Basic Pet Care".to_string(),
            description: "Learn about feeding, hygiene and basic care to keep your pet healthy and happy."
                .to_string(),
            date: now - Duration::days(7),
            location: "Online (Zoom)".to_string(),
            image_url: "https://images.pexels.com/photos/6646917/pexels-photo-6646917.jpeg"
                .to_string(),
            attendees: Some(65),
            created_by: "admin".to_string(),
        },
    ]
}

/// A full starter dataset: seed listings and events, no favorites.
#[must_use]
pub fn starter_data() -> StorageData {
    StorageData::with_catalog(listings(), events(Utc::now()))
}

//! Worker implementation for off-loop storage operations.
//!
//! [`ShelterWorker`] owns the storage backend and runs on its own thread. The
//! event loop sends it JSON-serialized [`WorkerMessage`]s and receives
//! [`WorkerResponse`]s in the same order. Tracing context carried by a message
//! is re-attached so worker spans link to the span that posted it.

use crate::domain::error::Result;
use crate::domain::{AdoptionStatus, Listing};
use crate::storage::backend::Storage;
use crate::storage::{seed, JsonStorage, MemoryStorage, NewListing};
use crate::worker::{WorkerMessage, WorkerResponse};
use crate::{Config, StorageBackend};

/// File name of the JSON store inside the data directory.
pub const STORAGE_FILE: &str = "shelter.json";

/// Storage executor for worker messages.
pub struct ShelterWorker {
    storage: Box<dyn Storage>,
}

impl ShelterWorker {
    #[must_use]
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Creates a worker with the backend selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON store cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage: Box<dyn Storage> = match config.storage {
            StorageBackend::Memory if config.seed_catalog => Box::new(MemoryStorage::seeded()),
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
            StorageBackend::Json => {
                let path = config.data_dir.join(STORAGE_FILE);
                if config.seed_catalog {
                    Box::new(JsonStorage::with_seed(path, seed::starter_data())?)
                } else {
                    Box::new(JsonStorage::new(path)?)
                }
            }
        };
        tracing::debug!(backend = ?config.storage, "worker storage initialized");
        Ok(Self::new(storage))
    }

    /// Standardizes error handling and success logging across storage operations.
    fn handle_db_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn handle_load_listings(&self, user_id: Option<&str>) -> WorkerResponse {
        let result = self.storage.fetch_listings().and_then(|listings| {
            let favorite_ids = match user_id {
                Some(user) => self.storage.favorite_ids(user)?,
                None => Vec::new(),
            };
            Ok((listings, favorite_ids))
        });

        Self::handle_db_result("load listings", result, |(listings, favorite_ids)| {
            tracing::debug!(
                listing_count = listings.len(),
                favorite_count = favorite_ids.len(),
                "listings loaded"
            );
            WorkerResponse::ListingsLoaded {
                listings,
                favorite_ids,
            }
        })
    }

    fn handle_load_listing(&self, listing_id: &str, user_id: Option<&str>) -> WorkerResponse {
        let result = self.storage.fetch_listing_by_id(listing_id).and_then(|listing| {
            let is_favorite = match (user_id, &listing) {
                (Some(user), Some(_)) => self.storage.is_favorite(listing_id, user)?,
                _ => false,
            };
            Ok((listing, is_favorite))
        });

        Self::handle_db_result("load listing", result, |(listing, is_favorite)| {
            WorkerResponse::ListingLoaded {
                listing,
                is_favorite,
            }
        })
    }

    /// Persists a favorite flag. Failures carry the attempted value so the
    /// event loop can revert its optimistic update.
    fn handle_set_favorite(
        &mut self,
        user_id: &str,
        listing_id: String,
        is_favorite: bool,
    ) -> WorkerResponse {
        match self.storage.set_favorite(user_id, &listing_id, is_favorite) {
            Ok(()) => {
                tracing::debug!(listing_id = %listing_id, is_favorite = is_favorite, "favorite synced");
                WorkerResponse::FavoriteSynced {
                    listing_id,
                    is_favorite,
                }
            }
            Err(e) => {
                tracing::debug!(listing_id = %listing_id, error = %e, "favorite sync failed");
                WorkerResponse::FavoriteSyncFailed {
                    listing_id,
                    is_favorite,
                    message: e.to_string(),
                }
            }
        }
    }

    fn handle_set_listing_status(
        &mut self,
        listing_id: String,
        status: AdoptionStatus,
    ) -> WorkerResponse {
        match self.storage.set_listing_status(&listing_id, status) {
            Ok(()) => WorkerResponse::StatusUpdated { listing_id, status },
            Err(e) => {
                tracing::debug!(listing_id = %listing_id, error = %e, "status update failed");
                WorkerResponse::StatusUpdateFailed {
                    listing_id,
                    message: e.to_string(),
                }
            }
        }
    }

    fn handle_add_listing(&mut self, user_id: &str, listing: NewListing) -> WorkerResponse {
        Self::handle_db_result(
            "add listing",
            self.storage.add_listing(listing, user_id),
            |listing| WorkerResponse::ListingAdded { listing },
        )
    }

    fn handle_load_favorites(&self, user_id: &str) -> WorkerResponse {
        let result = self.storage.favorite_ids(user_id).and_then(|ids| {
            let mut listings: Vec<Listing> = Vec::with_capacity(ids.len());
            for id in &ids {
                if let Some(listing) = self.storage.fetch_listing_by_id(id)? {
                    listings.push(listing);
                }
            }
            Ok(listings)
        });

        Self::handle_db_result("load favorites", result, |listings| {
            WorkerResponse::FavoritesLoaded { listings }
        })
    }

    fn handle_load_events(&self, user_id: Option<&str>) -> WorkerResponse {
        let result = self.storage.fetch_events().and_then(|events| {
            let mut registered_ids = Vec::new();
            if let Some(user) = user_id {
                for event in &events {
                    if self.storage.is_registered(&event.id, user)? {
                        registered_ids.push(event.id.clone());
                    }
                }
            }
            Ok((events, registered_ids))
        });

        Self::handle_db_result("load events", result, |(events, registered_ids)| {
            WorkerResponse::EventsLoaded {
                events,
                registered_ids,
            }
        })
    }

    fn handle_load_event(&self, event_id: &str, user_id: Option<&str>) -> WorkerResponse {
        let result = self.storage.fetch_event_by_id(event_id).and_then(|event| {
            let is_registered = match (user_id, &event) {
                (Some(user), Some(_)) => self.storage.is_registered(event_id, user)?,
                _ => false,
            };
            Ok((event, is_registered))
        });

        Self::handle_db_result("load event", result, |(event, is_registered)| {
            WorkerResponse::EventLoaded {
                event,
                is_registered,
            }
        })
    }

    fn handle_register_for_event(&mut self, event_id: String, user_id: &str) -> WorkerResponse {
        match self.storage.register_for_event(&event_id, user_id) {
            Ok(()) => WorkerResponse::Registered { event_id },
            Err(e) => WorkerResponse::RegistrationFailed {
                event_id,
                message: e.to_string(),
            },
        }
    }

    /// Reconstructs the poster's OpenTelemetry context on this thread.
    ///
    /// Returns a guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the matching response.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadListings { user_id, .. } => {
                self.handle_load_listings(user_id.as_deref())
            }
            WorkerMessage::LoadListing {
                listing_id,
                user_id,
                ..
            } => self.handle_load_listing(&listing_id, user_id.as_deref()),
            WorkerMessage::SetFavorite {
                user_id,
                listing_id,
                is_favorite,
                ..
            } => self.handle_set_favorite(&user_id, listing_id, is_favorite),
            WorkerMessage::SetListingStatus {
                listing_id, status, ..
            } => self.handle_set_listing_status(listing_id, status),
            WorkerMessage::AddListing {
                user_id, listing, ..
            } => self.handle_add_listing(&user_id, listing),
            WorkerMessage::LoadFavorites { user_id, .. } => self.handle_load_favorites(&user_id),
            WorkerMessage::LoadEvents { user_id, .. } => {
                self.handle_load_events(user_id.as_deref())
            }
            WorkerMessage::LoadEvent {
                event_id, user_id, ..
            } => self.handle_load_event(&event_id, user_id.as_deref()),
            WorkerMessage::RegisterForEvent {
                event_id, user_id, ..
            } => self.handle_register_for_event(event_id, &user_id),
        }
    }

    /// Handles one JSON-encoded message and returns the JSON-encoded response.
    ///
    /// Returns `None` if the payload cannot be decoded or the response cannot
    /// be encoded; both are logged.
    pub fn on_message(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = match serde_json::from_str(payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return None;
            }
        };

        let response = self.handle_message(message);

        match serde_json::to_string(&response) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker response");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker() -> ShelterWorker {
        ShelterWorker::new(Box::new(MemoryStorage::seeded()))
    }

    #[test]
    fn favorites_round_trip_through_worker() {
        let mut worker = worker();
        let response = worker.handle_message(WorkerMessage::set_favorite(
            "u1".into(),
            "2".into(),
            true,
        ));
        assert_eq!(
            response,
            WorkerResponse::FavoriteSynced {
                listing_id: "2".into(),
                is_favorite: true
            }
        );

        match worker.handle_message(WorkerMessage::load_listings(Some("u1".into()))) {
            WorkerResponse::ListingsLoaded {
                listings,
                favorite_ids,
            } => {
                assert_eq!(listings.len(), 4);
                assert_eq!(favorite_ids, vec!["2"]);
            }
            other => panic!("unexpected response: {other:?}"),
        }

        match worker.handle_message(WorkerMessage::load_favorites("u1".into())) {
            WorkerResponse::FavoritesLoaded { listings } => {
                assert_eq!(listings.len(), 1);
                assert_eq!(listings[0].name, "Luna");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn failed_favorite_write_reports_attempted_value() {
        let mut worker = worker();
        let response = worker.handle_message(WorkerMessage::set_favorite(
            "u1".into(),
            "missing".into(),
            true,
        ));
        assert!(matches!(
            response,
            WorkerResponse::FavoriteSyncFailed {
                ref listing_id,
                is_favorite: true,
                ..
            } if listing_id == "missing"
        ));
    }

    #[test]
    fn adopted_listing_cannot_go_back_to_pending() {
        let mut worker = worker();
        let response = worker.handle_message(WorkerMessage::set_listing_status(
            "4".into(),
            AdoptionStatus::Pending,
        ));
        assert!(matches!(response, WorkerResponse::StatusUpdateFailed { .. }));

        let response = worker.handle_message(WorkerMessage::set_listing_status(
            "1".into(),
            AdoptionStatus::Pending,
        ));
        assert_eq!(
            response,
            WorkerResponse::StatusUpdated {
                listing_id: "1".into(),
                status: AdoptionStatus::Pending
            }
        );
    }

    #[test]
    fn event_registration_is_reflected_in_loads() {
        let mut worker = worker();
        worker.handle_message(WorkerMessage::register_for_event("1".into(), "u1".into()));

        match worker.handle_message(WorkerMessage::load_event("1".into(), Some("u1".into()))) {
            WorkerResponse::EventLoaded {
                event: Some(event),
                is_registered,
            } => {
                assert!(is_registered);
                assert_eq!(event.attendees, Some(35));
            }
            other => panic!("unexpected response: {other:?}"),
        }

        match worker.handle_message(WorkerMessage::load_events(Some("u1".into()))) {
            WorkerResponse::EventsLoaded { registered_ids, .. } => {
                assert_eq!(registered_ids, vec!["1"]);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn json_payloads_in_and_out() {
        let mut worker = worker();
        let payload = serde_json::to_string(&WorkerMessage::load_listing("9".into(), None)).unwrap();
        let reply = worker.on_message(&payload).unwrap();
        let response: WorkerResponse = serde_json::from_str(&reply).unwrap();
        assert_eq!(
            response,
            WorkerResponse::ListingLoaded {
                listing: None,
                is_favorite: false
            }
        );

        assert!(worker.on_message("not json").is_none());
    }
}

//! Worker thread message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the event
//! loop and the background worker that owns the storage backend. Both sides
//! exchange these types as JSON. It also implements tracing context
//! propagation across the thread boundary.

use crate::domain::{AdoptionStatus, Listing, ShelterEvent};
use crate::storage::NewListing;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when passing messages to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid or not sampled,
    /// which is always the case when the OpenTelemetry layer is not installed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use shelter::worker::TraceContext;
    ///
    /// if let Some(ctx) = TraceContext::from_current() {
    ///     println!("Trace ID: {}", ctx.trace_id);
    /// }
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(
                trace_id = %trace_id,
                parent_span_id = %parent_span_id,
                "capturing trace context"
            );

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }
}

/// Generates builder methods for `WorkerMessage` variants.
///
/// Each builder attaches the current trace context to the message.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_listings(LoadListings { user_id: Option<String> }),
    load_listing(LoadListing { listing_id: String, user_id: Option<String> }),
    set_favorite(SetFavorite { user_id: String, listing_id: String, is_favorite: bool }),
    set_listing_status(SetListingStatus { listing_id: String, status: AdoptionStatus }),
    add_listing(AddListing { user_id: String, listing: NewListing }),
    load_favorites(LoadFavorites { user_id: String }),
    load_events(LoadEvents { user_id: Option<String> }),
    load_event(LoadEvent { event_id: String, user_id: Option<String> }),
    register_for_event(RegisterForEvent { event_id: String, user_id: String }),
}

/// Messages sent from the event loop to the worker thread.
///
/// Each variant is one storage operation. All variants carry an optional
/// trace context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch the whole catalog, plus the user's favorite ids if signed in.
    LoadListings {
        user_id: Option<String>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch one listing for its detail view.
    LoadListing {
        listing_id: String,
        user_id: Option<String>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist a favorite flag after an optimistic toggle.
    SetFavorite {
        user_id: String,
        listing_id: String,
        is_favorite: bool,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Advance a listing's adoption status.
    SetListingStatus {
        listing_id: String,
        status: AdoptionStatus,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Store a validated listing submission.
    AddListing {
        user_id: String,
        listing: NewListing,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch the listings a user has favorited.
    LoadFavorites {
        user_id: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch every event, plus the user's registrations if signed in.
    LoadEvents {
        user_id: Option<String>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch one event for its detail view.
    LoadEvent {
        event_id: String,
        user_id: Option<String>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Register a user for an event.
    RegisterForEvent {
        event_id: String,
        user_id: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// The trace context carried by any variant.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadListings { trace_context, .. }
            | Self::LoadListing { trace_context, .. }
            | Self::SetFavorite { trace_context, .. }
            | Self::SetListingStatus { trace_context, .. }
            | Self::AddListing { trace_context, .. }
            | Self::LoadFavorites { trace_context, .. }
            | Self::LoadEvents { trace_context, .. }
            | Self::LoadEvent { trace_context, .. }
            | Self::RegisterForEvent { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Responses sent from the worker thread back to the event loop.
///
/// Writes that the controller applied optimistically have a dedicated
/// failure variant carrying enough to roll back; everything else fails
/// through [`WorkerResponse::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    ListingsLoaded {
        listings: Vec<Listing>,
        /// Empty for anonymous loads.
        favorite_ids: Vec<String>,
    },

    ListingLoaded {
        listing: Option<Listing>,
        is_favorite: bool,
    },

    FavoriteSynced {
        listing_id: String,
        is_favorite: bool,
    },

    FavoriteSyncFailed {
        listing_id: String,
        /// The value that failed to persist.
        is_favorite: bool,
        message: String,
    },

    StatusUpdated {
        listing_id: String,
        status: AdoptionStatus,
    },

    StatusUpdateFailed {
        listing_id: String,
        message: String,
    },

    ListingAdded {
        listing: Listing,
    },

    FavoritesLoaded {
        listings: Vec<Listing>,
    },

    EventsLoaded {
        events: Vec<ShelterEvent>,
        /// Empty for anonymous loads.
        registered_ids: Vec<String>,
    },

    EventLoaded {
        event: Option<ShelterEvent>,
        is_registered: bool,
    },

    Registered {
        event_id: String,
    },

    RegistrationFailed {
        event_id: String,
        message: String,
    },

    /// An error occurred during the worker operation.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_attach_no_context_without_otel_layer() {
        let msg = WorkerMessage::set_favorite("u1".into(), "2".into(), true);
        assert_eq!(msg.trace_context(), None);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("trace_context"));
    }

    #[test]
    fn message_wire_format() {
        let msg = WorkerMessage::SetListingStatus {
            listing_id: "1".into(),
            status: AdoptionStatus::Pending,
            trace_context: Some(TraceContext {
                trace_id: "0".repeat(32),
                parent_span_id: "1".repeat(16),
            }),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["SetListingStatus"]["status"], "pending");
        let back: WorkerMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}

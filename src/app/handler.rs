//! Event handling and state transition logic.
//!
//! [`handle_event`] processes user input, auth outcomes and worker responses,
//! translating them into state changes and action sequences.
//!
//! # Architecture
//!
//! 1. Events arrive from the shell or the worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! Writes the user sees immediately (favorite toggles) are applied before the
//! worker is asked to persist them and settled when its response arrives.
//! Writes that need an identity are turned into [`Action::RedirectToLogin`]
//! when the [`AuthSession`] is anonymous.
//!
//! # Example
//!
//! ```rust
//! use shelter::app::{handle_event, Action, AppState, Event};
//! use shelter::auth::AuthSession;
//!
//! let mut state = AppState::new();
//! let auth = AuthSession::anonymous();
//! let (_, actions) = handle_event(
//!     &mut state,
//!     &auth,
//!     &Event::ToggleFavorite { listing_id: "1".into() },
//! )?;
//! assert_eq!(actions, vec![Action::RedirectToLogin]);
//! # Ok::<(), shelter::ShelterError>(())
//! ```

use super::forms::{LoginForm, NewListingForm, SignUpForm};
use super::modes::{EventTab, InputMode, SearchFocus, ViewMode};
use super::state::Detail;
use crate::app::{Action, AppState};
use crate::auth::AuthSession;
use crate::catalog::{CatalogStore, CategoryFilter};
use crate::domain::error::Result;
use crate::domain::{AdoptionStatus, AuthError, Category, Identity};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Notice shown after a favorite write fails and the toggle is reverted.
pub const FAVORITE_SYNC_FAILED: &str = "Could not update favorites. Please try again.";

/// Events triggered by user input, auth outcomes, or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The screen opened: fetch every snapshot it shows.
    Mount,
    /// Re-fetch every snapshot.
    Refresh,

    /// Moves selection cursor down by one position (wraps to top).
    KeyDown,
    /// Moves selection cursor up by one position (wraps to bottom).
    KeyUp,
    /// Quits.
    CloseFocus,

    /// Enters search mode with typing focus.
    SearchMode,
    /// Focuses the search input field (from navigating mode).
    FocusSearchBar,
    /// Focuses the result list (from typing mode).
    FocusResults,
    /// Exits search mode and clears the query.
    ExitSearch,
    /// Appends a character to the query while typing.
    Char(char),
    /// Removes the last character from the query while typing.
    Backspace,
    /// Clears the query and returns to normal mode.
    Escape,
    /// Replaces the query outright.
    SetQuery(String),

    SetCategory(CategoryFilter),
    /// Steps through all → dog → cat → other → all.
    CycleCategory,

    ShowAnimals,
    ShowEvents,
    /// Opens the signed-in user's favorites.
    ShowFavorites,
    SwitchEventTab(EventTab),

    /// Opens the detail of the row under the cursor.
    OpenSelected,
    CloseDetail,

    ToggleFavorite { listing_id: String },
    RequestAdoption { listing_id: String },
    RegisterForEvent { event_id: String },
    SubmitListing(NewListingForm),

    SubmitLogin(LoginForm),
    SubmitSignUp(SignUpForm),
    SignOut,

    /// The executor signed a user in or up.
    SignedIn(Identity),
    /// The identity provider rejected the attempt.
    AuthFailed(AuthError),
    /// The executor tore the session down.
    SignedOut,

    DismissNotice,

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Messages that fetch every snapshot for `user_id`.
fn reload_all(user_id: Option<&str>) -> Vec<Action> {
    let user = user_id.map(str::to_string);
    let mut actions = vec![
        Action::PostToWorker(WorkerMessage::load_listings(user.clone())),
        Action::PostToWorker(WorkerMessage::load_events(user)),
    ];
    if let Some(id) = user_id {
        actions.push(Action::PostToWorker(WorkerMessage::load_favorites(
            id.to_string(),
        )));
    }
    actions
}

/// Redirect to sign-in with an explanatory notice.
fn require_sign_in(state: &mut AppState, reason: &str) -> Result<(bool, Vec<Action>)> {
    tracing::debug!(reason = reason, "identity required, redirecting to sign-in");
    state.notice = Some(reason.to_string());
    Ok((true, vec![Action::RedirectToLogin]))
}

const fn next_category(current: CategoryFilter) -> CategoryFilter {
    match current {
        CategoryFilter::All => CategoryFilter::Only(Category::Dog),
        CategoryFilter::Only(Category::Dog) => CategoryFilter::Only(Category::Cat),
        CategoryFilter::Only(Category::Cat) => CategoryFilter::Only(Category::Other),
        CategoryFilter::Only(Category::Other) => CategoryFilter::All,
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns `(should_render, actions)`.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for handlers that need to
/// propagate failures.
#[allow(clippy::too_many_lines)]
pub fn handle_event(
    state: &mut AppState,
    auth: &AuthSession,
    event: &Event,
) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event",
        event_type = ?event,
        authenticated = auth.is_authenticated()
    )
    .entered();

    match event {
        Event::Mount | Event::Refresh => Ok((true, reload_all(auth.user_id()))),
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::Close])),
        Event::SearchMode | Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            if state.criteria.query.is_empty() {
                state.input_mode = InputMode::Normal;
            } else {
                state.input_mode = InputMode::Search(SearchFocus::Navigating);
            }
            Ok((true, vec![]))
        }
        Event::ExitSearch | Event::Escape => {
            tracing::debug!(query = %state.criteria.query, "exiting search mode");
            state.input_mode = InputMode::Normal;
            state.criteria.query.clear();
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }
            state.criteria.query.push(*c);
            tracing::trace!(query = %state.criteria.query, "search query updated");
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }
            state.criteria.query.pop();
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::SetQuery(query) => {
            state.criteria.query.clone_from(query);
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::SetCategory(category) => {
            state.criteria.category = *category;
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::CycleCategory => {
            state.criteria.category = next_category(state.criteria.category);
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::ShowAnimals => {
            state.view_mode = ViewMode::Animals;
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::ShowEvents => {
            state.view_mode = ViewMode::Events;
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::ShowFavorites => {
            let Some(user_id) = auth.user_id() else {
                return require_sign_in(state, "Sign in to see your favorites");
            };
            state.view_mode = ViewMode::Favorites;
            state.apply_filter();
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::load_favorites(
                    user_id.to_string(),
                ))],
            ))
        }
        Event::SwitchEventTab(tab) => {
            state.event_tab = *tab;
            state.apply_filter();
            Ok((true, vec![]))
        }
        Event::OpenSelected => {
            let user_id = auth.user_id().map(str::to_string);
            let message = match state.view_mode {
                ViewMode::Events => state
                    .selected_event()
                    .map(|event| WorkerMessage::load_event(event.id.clone(), user_id)),
                ViewMode::Animals | ViewMode::Favorites => state
                    .selected_listing()
                    .map(|listing| WorkerMessage::load_listing(listing.id.clone(), user_id)),
            };
            Ok((false, message.map(Action::PostToWorker).into_iter().collect()))
        }
        Event::CloseDetail => {
            state.detail = None;
            Ok((true, vec![]))
        }
        Event::ToggleFavorite { listing_id } => {
            let Some(user_id) = auth.user_id() else {
                tracing::debug!(listing_id = %listing_id, "anonymous favorite toggle");
                return Ok((false, vec![Action::RedirectToLogin]));
            };

            if state.find_listing(listing_id).is_none() {
                tracing::debug!(listing_id = %listing_id, "toggle for unknown listing");
                return Ok((false, vec![]));
            }

            let Some(is_favorite) = state.favorites.begin_toggle(listing_id) else {
                tracing::debug!(listing_id = %listing_id, "favorite sync in flight, ignoring toggle");
                return Ok((false, vec![]));
            };

            tracing::debug!(listing_id = %listing_id, is_favorite = is_favorite, "favorite toggled");
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::set_favorite(
                    user_id.to_string(),
                    listing_id.clone(),
                    is_favorite,
                ))],
            ))
        }
        Event::RequestAdoption { listing_id } => {
            if !auth.is_authenticated() {
                return require_sign_in(state, "Sign in to request an adoption");
            }

            let Some(listing) = state.find_listing(listing_id) else {
                state.notice = Some("Animal not found".to_string());
                return Ok((true, vec![]));
            };

            if !listing.is_available() {
                state.notice = Some(format!("{} is no longer available", listing.name));
                return Ok((true, vec![]));
            }

            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::set_listing_status(
                    listing_id.clone(),
                    AdoptionStatus::Pending,
                ))],
            ))
        }
        Event::RegisterForEvent { event_id } => {
            let Some(user_id) = auth.user_id() else {
                return require_sign_in(state, "Sign in to register for events");
            };

            let Some(shelter_event) = state.events.get(event_id) else {
                state.notice = Some("Event not found".to_string());
                return Ok((true, vec![]));
            };

            if shelter_event.is_past(chrono::Utc::now()) {
                state.notice = Some("This event has already happened".to_string());
                return Ok((true, vec![]));
            }

            if state.registered.contains(event_id) {
                state.notice = Some("You are already registered for this event".to_string());
                return Ok((true, vec![]));
            }

            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::register_for_event(
                    event_id.clone(),
                    user_id.to_string(),
                ))],
            ))
        }
        Event::SubmitListing(form) => {
            let Some(user_id) = auth.user_id() else {
                return require_sign_in(state, "Sign in to list an animal");
            };

            match form.validate() {
                Ok(listing) => Ok((
                    false,
                    vec![Action::PostToWorker(WorkerMessage::add_listing(
                        user_id.to_string(),
                        listing,
                    ))],
                )),
                Err(e) => {
                    state.notice = Some(e.to_string());
                    Ok((true, vec![]))
                }
            }
        }
        Event::SubmitLogin(form) => match form.validate() {
            Ok(()) => Ok((
                false,
                vec![Action::SignIn {
                    email: form.email.trim().to_string(),
                    password: form.password.clone(),
                }],
            )),
            Err(e) => {
                state.notice = Some(e.to_string());
                Ok((true, vec![]))
            }
        },
        Event::SubmitSignUp(form) => match form.validate() {
            Ok(sign_up) => Ok((false, vec![Action::SignUp(sign_up)])),
            Err(e) => {
                state.notice = Some(e.to_string());
                Ok((true, vec![]))
            }
        },
        Event::SignOut => {
            if auth.is_authenticated() {
                Ok((false, vec![Action::SignOut]))
            } else {
                Ok((false, vec![]))
            }
        }
        Event::SignedIn(identity) => {
            tracing::debug!(user_id = %identity.user_id, "signed in");
            state.notice = Some(format!("Welcome, {}", identity.display_name));
            Ok((true, reload_all(Some(identity.user_id.as_str()))))
        }
        Event::AuthFailed(error) => {
            tracing::debug!(error = %error, "authentication failed");
            state.notice = Some(error.to_string());
            Ok((true, vec![]))
        }
        Event::SignedOut => {
            state.favorites.clear();
            state.registered.clear();
            state.favorite_listings = CatalogStore::default();
            state.detail = None;
            if state.view_mode == ViewMode::Favorites {
                state.view_mode = ViewMode::Animals;
            }
            state.apply_filter();
            Ok((true, reload_all(None)))
        }
        Event::DismissNotice => {
            let had_notice = state.notice.take().is_some();
            Ok((had_notice, vec![]))
        }
        Event::WorkerResponse(response) => handle_worker_response(state, auth, response),
    }
}

fn handle_worker_response(
    state: &mut AppState,
    auth: &AuthSession,
    response: &WorkerResponse,
) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::ListingsLoaded {
            listings,
            favorite_ids,
        } => {
            let old_filtered = state.filtered_ids.clone();
            state.listings = CatalogStore::from_fetch(listings.clone());
            state.favorites.reset(favorite_ids.iter().map(String::as_str));
            state.apply_filter();
            tracing::debug!(
                listing_count = state.listings.len(),
                favorite_count = favorite_ids.len(),
                changed = state.filtered_ids != old_filtered,
                "listings loaded"
            );
            Ok((true, vec![]))
        }
        WorkerResponse::ListingLoaded {
            listing,
            is_favorite,
        } => {
            match listing {
                Some(listing) => {
                    if !state.favorites.commit_loaded(&listing.id, *is_favorite) {
                        tracing::debug!(listing_id = %listing.id, "favorite sync in flight, keeping pending value");
                    }
                    state.detail = Some(Detail::Listing(listing.clone()));
                }
                None => state.notice = Some("Animal not found".to_string()),
            }
            Ok((true, vec![]))
        }
        WorkerResponse::FavoriteSynced {
            listing_id,
            is_favorite,
        } => {
            if !state.favorites.confirm(listing_id, *is_favorite) {
                tracing::debug!(listing_id = %listing_id, "stale favorite confirmation");
            }
            Ok((true, vec![]))
        }
        WorkerResponse::FavoriteSyncFailed {
            listing_id,
            is_favorite,
            message,
        } => {
            let restored = state.favorites.rollback(listing_id);
            tracing::warn!(
                listing_id = %listing_id,
                attempted = is_favorite,
                restored = restored,
                error = %message,
                "favorite sync failed, reverted"
            );
            state.notice = Some(FAVORITE_SYNC_FAILED.to_string());
            Ok((true, vec![]))
        }
        WorkerResponse::StatusUpdated { listing_id, status } => {
            tracing::debug!(listing_id = %listing_id, status = %status, "status updated");
            state.notice = Some(match status {
                AdoptionStatus::Pending => "Adoption request sent".to_string(),
                other => format!("Status changed to {}", other.label()),
            });
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::load_listings(
                    auth.user_id().map(str::to_string),
                ))],
            ))
        }
        WorkerResponse::StatusUpdateFailed {
            listing_id,
            message,
        } => {
            tracing::warn!(listing_id = %listing_id, error = %message, "status update failed");
            state.notice = Some(format!("Could not send the adoption request: {message}"));
            Ok((true, vec![]))
        }
        WorkerResponse::ListingAdded { listing } => {
            state.notice = Some(format!("{} is now listed for adoption", listing.name));
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::load_listings(
                    auth.user_id().map(str::to_string),
                ))],
            ))
        }
        WorkerResponse::FavoritesLoaded { listings } => {
            state.favorite_listings = CatalogStore::from_fetch(listings.clone());
            state
                .favorites
                .mark(listings.iter().map(|listing| listing.id.as_str()));
            state.apply_filter();
            Ok((state.view_mode == ViewMode::Favorites, vec![]))
        }
        WorkerResponse::EventsLoaded {
            events,
            registered_ids,
        } => {
            state.events = CatalogStore::from_fetch(events.clone());
            state.registered = registered_ids.iter().cloned().collect();
            state.apply_filter();
            Ok((true, vec![]))
        }
        WorkerResponse::EventLoaded {
            event,
            is_registered,
        } => {
            match event {
                Some(event) => {
                    state.detail = Some(Detail::Event {
                        event: event.clone(),
                        is_registered: *is_registered,
                    });
                }
                None => state.notice = Some("Event not found".to_string()),
            }
            Ok((true, vec![]))
        }
        WorkerResponse::Registered { event_id } => {
            state.registered.insert(event_id.clone());
            if let Some(Detail::Event { event, is_registered }) = &mut state.detail {
                if &event.id == event_id {
                    *is_registered = true;
                }
            }
            state.notice = Some("Registration confirmed".to_string());
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::load_events(
                    auth.user_id().map(str::to_string),
                ))],
            ))
        }
        WorkerResponse::RegistrationFailed { event_id, message } => {
            tracing::warn!(event_id = %event_id, error = %message, "registration failed");
            state.notice = Some(format!("Could not register: {message}"));
            Ok((true, vec![]))
        }
        WorkerResponse::Error { message } => {
            tracing::error!(error = %message, "worker error");
            state.notice = Some(message.clone());
            Ok((true, vec![]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Listing, ShelterEvent};
    use chrono::{Duration, Utc};

    fn identity() -> Identity {
        Identity {
            user_id: "u1".into(),
            email: "ana@example.com".into(),
            display_name: "Ana".into(),
            phone: None,
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new();
        let response = WorkerResponse::ListingsLoaded {
            listings: vec![
                Listing::new("1", Category::Dog, "Max", "Friendly"),
                Listing::new("2", Category::Cat, "Luna", "Calm"),
            ],
            favorite_ids: vec!["2".into()],
        };
        handle_event(
            &mut state,
            &AuthSession::anonymous(),
            &Event::WorkerResponse(response),
        )
        .unwrap();
        state
    }

    fn toggle(state: &mut AppState, auth: &AuthSession, id: &str) -> Vec<Action> {
        handle_event(
            state,
            auth,
            &Event::ToggleFavorite {
                listing_id: id.into(),
            },
        )
        .unwrap()
        .1
    }

    #[test]
    fn anonymous_toggle_redirects_without_state_change() {
        let mut state = loaded_state();
        let before = state.favorites.state("1");

        let actions = toggle(&mut state, &AuthSession::anonymous(), "1");

        assert_eq!(actions, vec![Action::RedirectToLogin]);
        assert_eq!(state.favorites.state("1"), before);
        assert!(state.notice.is_none());
    }

    #[test]
    fn toggle_is_optimistic_and_posts_write() {
        let mut state = loaded_state();
        let auth = AuthSession::signed_in(identity());

        let actions = toggle(&mut state, &auth, "1");

        assert!(state.favorites.is_favorite("1"));
        assert!(state.favorites.is_syncing("1"));
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::SetFavorite {
                user_id,
                listing_id,
                is_favorite: true,
                ..
            })] if user_id == "u1" && listing_id == "1"
        ));
    }

    #[test]
    fn failed_sync_reverts_to_pre_toggle_value() {
        let mut state = loaded_state();
        let auth = AuthSession::signed_in(identity());
        assert!(state.favorites.is_favorite("2"));

        toggle(&mut state, &auth, "2");
        assert!(!state.favorites.is_favorite("2"));

        handle_event(
            &mut state,
            &auth,
            &Event::WorkerResponse(WorkerResponse::FavoriteSyncFailed {
                listing_id: "2".into(),
                is_favorite: false,
                message: "offline".into(),
            }),
        )
        .unwrap();

        assert!(state.favorites.is_favorite("2"));
        assert!(!state.favorites.is_syncing("2"));
        assert_eq!(state.notice.as_deref(), Some(FAVORITE_SYNC_FAILED));
    }

    #[test]
    fn toggling_twice_with_confirmations_restores_value() {
        let mut state = loaded_state();
        let auth = AuthSession::signed_in(identity());

        for expected in [true, false] {
            toggle(&mut state, &auth, "1");
            handle_event(
                &mut state,
                &auth,
                &Event::WorkerResponse(WorkerResponse::FavoriteSynced {
                    listing_id: "1".into(),
                    is_favorite: expected,
                }),
            )
            .unwrap();
            assert_eq!(state.favorites.is_favorite("1"), expected);
        }
    }

    #[test]
    fn second_toggle_while_in_flight_is_ignored() {
        let mut state = loaded_state();
        let auth = AuthSession::signed_in(identity());
        assert_eq!(toggle(&mut state, &auth, "1").len(), 1);
        assert!(toggle(&mut state, &auth, "1").is_empty());
        assert!(state.favorites.is_favorite("1"));
    }

    #[test]
    fn detail_load_clears_stale_favorite_flag() {
        let mut state = loaded_state();
        let auth = AuthSession::signed_in(identity());
        assert!(state.favorites.is_favorite("2"));

        let loaded = |is_favorite| {
            Event::WorkerResponse(WorkerResponse::ListingLoaded {
                listing: Some(Listing::new("2", Category::Cat, "Luna", "Calm")),
                is_favorite,
            })
        };

        handle_event(&mut state, &auth, &loaded(false)).unwrap();
        assert!(!state.favorites.is_favorite("2"));

        toggle(&mut state, &auth, "2");
        handle_event(&mut state, &auth, &loaded(false)).unwrap();
        assert!(state.favorites.is_favorite("2"));
        assert!(state.favorites.is_syncing("2"));
    }

    #[test]
    fn toggling_unknown_listing_does_nothing() {
        let mut state = loaded_state();
        let auth = AuthSession::signed_in(identity());
        assert!(toggle(&mut state, &auth, "404").is_empty());
        assert!(!state.favorites.is_syncing("404"));
    }

    #[test]
    fn adoption_request_only_for_available_listings() {
        let mut state = AppState::new();
        let mut bella = Listing::new("4", Category::Dog, "Bella", "");
        bella.status = AdoptionStatus::Adopted;
        state.listings =
            CatalogStore::from_fetch(vec![Listing::new("1", Category::Dog, "Max", ""), bella]);
        let auth = AuthSession::signed_in(identity());

        let (_, actions) = handle_event(
            &mut state,
            &auth,
            &Event::RequestAdoption {
                listing_id: "4".into(),
            },
        )
        .unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.notice.as_deref(), Some("Bella is no longer available"));

        let (_, actions) = handle_event(
            &mut state,
            &auth,
            &Event::RequestAdoption {
                listing_id: "1".into(),
            },
        )
        .unwrap();
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::SetListingStatus {
                status: AdoptionStatus::Pending,
                ..
            })]
        ));

        let (_, actions) = handle_event(
            &mut state,
            &AuthSession::anonymous(),
            &Event::RequestAdoption {
                listing_id: "1".into(),
            },
        )
        .unwrap();
        assert_eq!(actions, vec![Action::RedirectToLogin]);
    }

    #[test]
    fn past_events_cannot_be_registered() {
        let now = Utc::now();
        let mut state = AppState::new();
        let event = |id: &str, date| ShelterEvent {
            id: id.into(),
            title: "Fair".into(),
            description: String::new(),
            date,
            location: "Park".into(),
            image_url: String::new(),
            attendees: Some(3),
            created_by: "admin".into(),
        };
        state.events = CatalogStore::from_fetch(vec![
            event("past", now - Duration::days(2)),
            event("soon", now + Duration::days(2)),
        ]);
        let auth = AuthSession::signed_in(identity());

        let (_, actions) = handle_event(
            &mut state,
            &auth,
            &Event::RegisterForEvent {
                event_id: "past".into(),
            },
        )
        .unwrap();
        assert!(actions.is_empty());

        let (_, actions) = handle_event(
            &mut state,
            &auth,
            &Event::RegisterForEvent {
                event_id: "soon".into(),
            },
        )
        .unwrap();
        assert_eq!(actions.len(), 1);

        handle_event(
            &mut state,
            &auth,
            &Event::WorkerResponse(WorkerResponse::Registered {
                event_id: "soon".into(),
            }),
        )
        .unwrap();
        assert!(state.registered.contains("soon"));
    }

    #[test]
    fn invalid_forms_surface_first_error() {
        let mut state = AppState::new();
        let auth = AuthSession::signed_in(identity());

        let (render, actions) = handle_event(
            &mut state,
            &auth,
            &Event::SubmitListing(NewListingForm {
                name: "Rex".into(),
                ..Default::default()
            }),
        )
        .unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(state.notice.as_deref(), Some("age is required"));

        let (_, actions) = handle_event(
            &mut state,
            &AuthSession::anonymous(),
            &Event::SubmitLogin(LoginForm {
                email: "ana@example.com".into(),
                password: String::new(),
            }),
        )
        .unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.notice.as_deref(), Some("password is required"));
    }

    #[test]
    fn sign_out_resets_favorites_and_reloads_anonymously() {
        let mut state = loaded_state();
        state.view_mode = ViewMode::Favorites;

        let (_, actions) = handle_event(&mut state, &AuthSession::anonymous(), &Event::SignedOut)
            .unwrap();

        assert!(!state.favorites.is_favorite("2"));
        assert_eq!(state.view_mode, ViewMode::Animals);
        assert!(actions.contains(&Action::PostToWorker(WorkerMessage::LoadListings {
            user_id: None,
            trace_context: None,
        })));
    }

    #[test]
    fn search_typing_filters_live() {
        let mut state = loaded_state();
        let auth = AuthSession::anonymous();
        handle_event(&mut state, &auth, &Event::SearchMode).unwrap();
        for c in "LU".chars() {
            handle_event(&mut state, &auth, &Event::Char(c)).unwrap();
        }
        assert_eq!(state.filtered_ids, vec!["2"]);

        handle_event(&mut state, &auth, &Event::Escape).unwrap();
        assert_eq!(state.filtered_ids, vec!["1", "2"]);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn category_cycles_back_to_all() {
        let mut state = loaded_state();
        let auth = AuthSession::anonymous();
        for _ in 0..4 {
            handle_event(&mut state, &auth, &Event::CycleCategory).unwrap();
        }
        assert_eq!(state.criteria.category, CategoryFilter::All);
    }
}

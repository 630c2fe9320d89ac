//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event so
//! several side effects can be queued at once. The shell's action executor
//! runs them in order: worker messages go to the storage thread, auth actions
//! go through the [`AuthSession`](crate::auth::AuthSession), and their
//! outcomes come back as new events.
//!
//! # Example
//!
//! ```rust
//! use shelter::app::Action;
//! use shelter::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_listings(None)),
//!     Action::PostToWorker(WorkerMessage::load_events(None)),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::auth::SignUp;
use crate::worker::WorkerMessage;

/// Commands produced by the event handler and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Ends the session loop.
    Close,

    /// Posts a message to the background storage worker.
    PostToWorker(WorkerMessage),

    /// Sends the user to the sign-in flow.
    ///
    /// Emitted instead of any write that needs an identity.
    RedirectToLogin,

    /// Authenticates with validated credentials.
    ///
    /// The executor reports back with `Event::SignedIn` or `Event::AuthFailed`.
    SignIn { email: String, password: String },

    /// Creates an account from a validated sign-up form.
    SignUp(SignUp),

    /// Tears the auth session down, then reports `Event::SignedOut`.
    SignOut,
}

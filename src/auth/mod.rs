//! Authentication: the identity collaborator and the session context.
//!
//! - [`provider`]: [`IdentityProvider`] trait, the shared [`AccountBook`] and
//!   the in-process [`MemoryIdentityProvider`]
//! - [`json`]: [`JsonIdentityProvider`], accounts persisted next to the store
//! - [`session`]: [`AuthSession`], the explicit "who is signed in" context the
//!   event handler reads on every favorite, adoption or registration request

pub mod json;
pub mod provider;
pub mod session;

pub use json::{JsonIdentityProvider, ACCOUNTS_FILE};
pub use provider::{AccountBook, IdentityProvider, MemoryIdentityProvider, SignUp, MIN_PASSWORD_LEN};
pub use session::AuthSession;

use crate::domain::error::Result;
use crate::{Config, StorageBackend};

/// Creates the identity provider matching the configured storage backend.
///
/// Accounts live wherever favorites live, so user ids stay valid for as long
/// as the data keyed by them.
///
/// # Errors
///
/// Returns an error if the JSON account book cannot be opened.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn IdentityProvider>> {
    let provider: Box<dyn IdentityProvider> = match config.storage {
        StorageBackend::Memory => Box::new(MemoryIdentityProvider::new()),
        StorageBackend::Json => Box::new(JsonIdentityProvider::open(
            config.data_dir.join(ACCOUNTS_FILE),
        )?),
    };
    tracing::debug!(backend = ?config.storage, "identity provider initialized");
    Ok(provider)
}

//! Error types for the shelter catalog.
//!
//! This module defines the centralized error type [`ShelterError`] and a type alias
//! [`Result`] used throughout the crate. Errors fall into three user-facing classes:
//!
//! - [`ValidationError`]: a form is missing required fields, surfaced inline
//! - [`AuthError`]: the identity provider rejected the credentials
//! - [`ShelterError::Sync`]: a favorite or status write did not persist
//!
//! None of them are fatal. Screens recover by letting the user retry.

use crate::domain::listing::AdoptionStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The main error type for shelter operations.
///
/// Most variants carry a description string so they can cross the worker
/// boundary as plain text. I/O errors convert automatically via `#[from]`.
///
/// # Examples
///
/// ```
/// use shelter::domain::{ShelterError, ValidationError, FormField};
///
/// let err: ShelterError = ValidationError::Missing(FormField::Name).into();
/// assert_eq!(err.to_string(), "name is required");
/// ```
#[derive(Debug, Error)]
pub enum ShelterError {
    /// A form failed its presence checks.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The identity provider rejected a sign-in or sign-up attempt.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A favorite or status write failed to persist.
    ///
    /// Callers revert any optimistic state they applied before the write.
    #[error("Sync error: {0}")]
    Sync(String),

    /// The requested listing, event or user does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A listing status change outside `available → pending → adopted`.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: AdoptionStatus,
        to: AdoptionStatus,
    },

    /// Reading or writing the storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

/// Form fields that can fail a presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormField {
    Name,
    Age,
    Category,
    Description,
    Images,
    Email,
    Password,
    PasswordConfirmation,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Category => "category",
            Self::Description => "description",
            Self::Images => "at least one photo",
            Self::Email => "email",
            Self::Password => "password",
            Self::PasswordConfirmation => "password confirmation",
        };
        f.write_str(label)
    }
}

/// Form validation failures.
///
/// Validation stops at the first failing field, so a form reports exactly one
/// of these at a time.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(FormField),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("age must be a whole number of months")]
    InvalidAge,

    #[error("at most {max} photos can be attached")]
    TooManyImages { max: usize },

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Identity provider failures, mapped to user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AuthError {
    #[error("incorrect email or password")]
    InvalidCredential,

    #[error("user not found")]
    UserNotFound,

    #[error("incorrect password")]
    WrongPassword,

    #[error("this email is already in use")]
    EmailInUse,

    #[error("invalid email")]
    InvalidEmail,

    #[error("the password is too weak")]
    WeakPassword,
}

/// A specialized `Result` type for shelter operations.
pub type Result<T> = std::result::Result<T, ShelterError>;

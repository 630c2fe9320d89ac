//! Identity provider abstraction and the account book behind both providers.

use crate::domain::error::{AuthError, Result};
use crate::domain::Identity;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Passwords shorter than this are rejected as weak at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A validated sign-up request.
///
/// Produced by [`SignUpForm::validate`](crate::app::forms::SignUpForm::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// The identity collaborator: verifies credentials and creates accounts.
///
/// Failures are reported as [`AuthError`] kinds wrapped in
/// [`ShelterError::Auth`](crate::domain::ShelterError::Auth).
pub trait IdentityProvider: Send {
    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the email is malformed, unknown, or the
    /// password does not match.
    fn authenticate(&mut self, email: &str, password: &str) -> Result<Identity>;

    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the email is malformed or taken, or the
    /// password is too weak.
    fn register(&mut self, sign_up: SignUp) -> Result<Identity>;

    /// Ends the provider-side session.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached.
    fn deauthenticate(&mut self) -> Result<()>;

    /// The identity restored from a previous run, if any.
    fn current_identity(&self) -> Option<Identity>;
}

/// Format version of the serialized account book.
pub const ACCOUNTS_VERSION: u32 = 1;

/// One stored account. The password is kept as a salted SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Account {
    salt: String,
    password_hash: String,
    identity: Identity,
}

impl Account {
    fn new(password: &str, identity: Identity) -> Self {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        let password_hash = digest(&salt, password);
        Self {
            salt,
            password_hash,
            identity,
        }
    }

    fn verify(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.password_hash
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Registered accounts keyed by lower-cased email, plus who is signed in.
///
/// Shared by the memory and JSON providers; the JSON provider serializes it
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBook {
    pub version: u32,
    #[serde(default)]
    accounts: BTreeMap<String, Account>,
    #[serde(default)]
    signed_in: Option<String>,
}

impl Default for AccountBook {
    fn default() -> Self {
        Self {
            version: ACCOUNTS_VERSION,
            accounts: BTreeMap::new(),
            signed_in: None,
        }
    }
}

impl AccountBook {
    /// Number of registered accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Checks credentials and marks the account signed in.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredential`] for a malformed email,
    /// [`AuthError::UserNotFound`] or [`AuthError::WrongPassword`] otherwise.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<Identity> {
        let key = email.trim().to_lowercase();
        if !is_well_formed_email(&key) {
            return Err(AuthError::InvalidCredential.into());
        }

        let account = self.accounts.get(&key).ok_or(AuthError::UserNotFound)?;
        if !account.verify(password) {
            tracing::debug!("password mismatch");
            return Err(AuthError::WrongPassword.into());
        }

        let identity = account.identity.clone();
        self.signed_in = Some(key);
        tracing::debug!(user_id = %identity.user_id, "signed in");
        Ok(identity)
    }

    /// Creates an account and marks it signed in.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidEmail`], [`AuthError::WeakPassword`] or
    /// [`AuthError::EmailInUse`].
    pub fn register(&mut self, sign_up: SignUp) -> Result<Identity> {
        let key = sign_up.email.trim().to_lowercase();
        if !is_well_formed_email(&key) {
            return Err(AuthError::InvalidEmail.into());
        }
        if sign_up.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword.into());
        }
        if self.accounts.contains_key(&key) {
            return Err(AuthError::EmailInUse.into());
        }

        let identity = Identity {
            user_id: uuid::Uuid::new_v4().to_string(),
            email: key.clone(),
            display_name: sign_up.name.trim().to_string(),
            phone: sign_up.phone.filter(|p| !p.trim().is_empty()),
        };

        self.accounts
            .insert(key.clone(), Account::new(&sign_up.password, identity.clone()));
        self.signed_in = Some(key);

        tracing::debug!(user_id = %identity.user_id, "account created");
        Ok(identity)
    }

    pub fn sign_out(&mut self) {
        self.signed_in = None;
    }

    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.signed_in
            .as_ref()
            .and_then(|key| self.accounts.get(key))
            .map(|account| account.identity.clone())
    }
}

/// Accounts kept in process memory. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityProvider {
    book: AccountBook,
}

impl MemoryIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.book.len()
    }
}

/// Loose shape check: one `@`, a non-empty local part and a dotted domain.
fn is_well_formed_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
        && !email.chars().any(char::is_whitespace)
}

impl IdentityProvider for MemoryIdentityProvider {
    fn authenticate(&mut self, email: &str, password: &str) -> Result<Identity> {
        let _span = tracing::debug_span!("authenticate").entered();
        self.book.authenticate(email, password)
    }

    fn register(&mut self, sign_up: SignUp) -> Result<Identity> {
        let _span = tracing::debug_span!("register").entered();
        self.book.register(sign_up)
    }

    fn deauthenticate(&mut self) -> Result<()> {
        self.book.sign_out();
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.book.current_identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShelterError;

    fn ana() -> SignUp {
        SignUp {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "secret1".into(),
            phone: None,
        }
    }

    fn auth_error(result: Result<Identity>) -> AuthError {
        match result {
            Err(ShelterError::Auth(e)) => e,
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn register_then_authenticate() {
        let mut provider = MemoryIdentityProvider::new();
        let created = provider.register(ana()).unwrap();
        provider.deauthenticate().unwrap();
        assert!(provider.current_identity().is_none());

        let signed_in = provider.authenticate("ANA@example.com", "secret1").unwrap();
        assert_eq!(created, signed_in);
        assert_eq!(provider.current_identity(), Some(signed_in));
    }

    #[test]
    fn sign_in_failures_map_to_kinds() {
        let mut provider = MemoryIdentityProvider::new();
        provider.register(ana()).unwrap();

        assert_eq!(
            auth_error(provider.authenticate("not-an-email", "x")),
            AuthError::InvalidCredential
        );
        assert_eq!(
            auth_error(provider.authenticate("bob@example.com", "secret1")),
            AuthError::UserNotFound
        );
        assert_eq!(
            auth_error(provider.authenticate("ana@example.com", "wrong!")),
            AuthError::WrongPassword
        );
    }

    #[test]
    fn sign_up_failures_map_to_kinds() {
        let mut provider = MemoryIdentityProvider::new();
        provider.register(ana()).unwrap();

        let mut taken = ana();
        taken.name = "Other Ana".into();
        assert_eq!(auth_error(provider.register(taken)), AuthError::EmailInUse);

        let mut weak = ana();
        weak.email = "weak@example.com".into();
        weak.password = "12345".into();
        assert_eq!(auth_error(provider.register(weak)), AuthError::WeakPassword);

        let mut malformed = ana();
        malformed.email = "ana@localhost".into();
        assert_eq!(auth_error(provider.register(malformed)), AuthError::InvalidEmail);

        assert_eq!(provider.account_count(), 1);
    }

    #[test]
    fn blank_phone_is_dropped() {
        let mut provider = MemoryIdentityProvider::new();
        let mut sign_up = ana();
        sign_up.phone = Some("  ".into());
        assert_eq!(provider.register(sign_up).unwrap().phone, None);
    }

    #[test]
    fn passwords_are_not_stored_in_clear() {
        let mut book = AccountBook::default();
        book.register(ana()).unwrap();

        let json = serde_json::to_string(&book).unwrap();
        assert!(!json.contains("secret1"));
        assert!(json.contains("password_hash"));
    }
}

//! Account book persisted as a JSON file in the data directory.
//!
//! Uses the same atomic write as [`JsonStorage`](crate::storage::JsonStorage),
//! so user ids, and the favorites and registrations keyed by them, survive a
//! restart. The signed-in account is persisted too, so the session is
//! restored on the next start.

use crate::auth::provider::{AccountBook, IdentityProvider, SignUp, ACCOUNTS_VERSION};
use crate::domain::error::{Result, ShelterError};
use crate::domain::Identity;
use std::path::{Path, PathBuf};

/// File name of the account book inside the data directory.
pub const ACCOUNTS_FILE: &str = "accounts.json";

pub struct JsonIdentityProvider {
    file_path: PathBuf,
    book: AccountBook,
}

impl JsonIdentityProvider {
    /// Opens the account book, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, or the
    /// file cannot be read, does not parse, or has a newer format version.
    pub fn open(file_path: PathBuf) -> Result<Self> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let book = if file_path.exists() {
            let contents = std::fs::read_to_string(&file_path)?;
            let book: AccountBook = serde_json::from_str(&contents)
                .map_err(|e| ShelterError::Storage(format!("failed to parse accounts: {e}")))?;
            if book.version > ACCOUNTS_VERSION {
                return Err(ShelterError::Storage(format!(
                    "unsupported accounts version {} (expected {ACCOUNTS_VERSION})",
                    book.version
                )));
            }
            book
        } else {
            AccountBook::default()
        };

        tracing::debug!(path = ?file_path, accounts = book.len(), "account book opened");
        Ok(Self { file_path, book })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    #[must_use]
    pub fn account_count(&self) -> usize {
        self.book.len()
    }

    fn save(path: &Path, book: &AccountBook) -> Result<()> {
        let json = serde_json::to_string_pretty(book)
            .map_err(|e| ShelterError::Storage(format!("failed to serialize accounts: {e}")))?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Applies `op` to a copy of the book and adopts it once it is on disk.
    fn mutate<T>(&mut self, op: impl FnOnce(&mut AccountBook) -> Result<T>) -> Result<T> {
        let mut next = self.book.clone();
        let value = op(&mut next)?;
        Self::save(&self.file_path, &next)?;
        self.book = next;
        Ok(value)
    }
}

impl IdentityProvider for JsonIdentityProvider {
    fn authenticate(&mut self, email: &str, password: &str) -> Result<Identity> {
        let _span = tracing::debug_span!("json_authenticate").entered();
        self.mutate(|book| book.authenticate(email, password))
    }

    fn register(&mut self, sign_up: SignUp) -> Result<Identity> {
        let _span = tracing::debug_span!("json_register").entered();
        self.mutate(|book| book.register(sign_up))
    }

    fn deauthenticate(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("json_deauthenticate").entered();
        self.mutate(|book| {
            book.sign_out();
            Ok(())
        })
    }

    fn current_identity(&self) -> Option<Identity> {
        self.book.current_identity()
    }
}

impl std::fmt::Debug for JsonIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonIdentityProvider")
            .field("file_path", &self.file_path)
            .field("accounts", &self.book.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuthError;
    use tempfile::TempDir;

    fn ana() -> SignUp {
        SignUp {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "secret1".into(),
            phone: None,
        }
    }

    #[test]
    fn accounts_and_session_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(ACCOUNTS_FILE);

        let created = {
            let mut provider = JsonIdentityProvider::open(path.clone()).unwrap();
            provider.register(ana()).unwrap()
        };

        let mut reopened = JsonIdentityProvider::open(path.clone()).unwrap();
        assert_eq!(reopened.current_identity(), Some(created.clone()));

        reopened.deauthenticate().unwrap();
        let mut again = JsonIdentityProvider::open(path).unwrap();
        assert_eq!(again.current_identity(), None);

        let signed_in = again.authenticate("ana@example.com", "secret1").unwrap();
        assert_eq!(signed_in.user_id, created.user_id);
    }

    #[test]
    fn rejected_sign_up_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(ACCOUNTS_FILE);
        let mut provider = JsonIdentityProvider::open(path.clone()).unwrap();

        let mut weak = ana();
        weak.password = "123".into();
        assert!(matches!(
            provider.register(weak),
            Err(ShelterError::Auth(AuthError::WeakPassword))
        ));
        assert!(!path.exists());
        assert_eq!(provider.account_count(), 0);
    }

    #[test]
    fn failed_save_keeps_session_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(ACCOUNTS_FILE);
        let mut provider = JsonIdentityProvider::open(path.clone()).unwrap();
        provider.register(ana()).unwrap();

        std::fs::create_dir(path.with_extension("tmp")).unwrap();
        assert!(provider.deauthenticate().is_err());
        assert!(provider.current_identity().is_some());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(ACCOUNTS_FILE);
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            JsonIdentityProvider::open(path),
            Err(ShelterError::Storage(_))
        ));
    }
}

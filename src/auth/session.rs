//! The signed-in user context.

use crate::auth::provider::{IdentityProvider, SignUp};
use crate::domain::error::Result;
use crate::domain::Identity;

/// Who is signed in, if anyone.
///
/// Created once at startup with [`AuthSession::init`] and passed by reference
/// to [`handle_event`](crate::app::handle_event). Only the action executor
/// mutates it, through the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    identity: Option<Identity>,
}

impl AuthSession {
    /// A session with nobody signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session already signed in as `identity`.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Restores whatever identity the provider still holds.
    #[must_use]
    pub fn init(provider: &dyn IdentityProvider) -> Self {
        let identity = provider.current_identity();
        tracing::debug!(restored = identity.is_some(), "auth session initialized");
        Self { identity }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|who| who.user_id.as_str())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Signs in through the provider and stores the identity.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the session is left unchanged.
    pub fn sign_in(
        &mut self,
        provider: &mut dyn IdentityProvider,
        email: &str,
        password: &str,
    ) -> Result<&Identity> {
        let identity = provider.authenticate(email, password)?;
        Ok(self.identity.insert(identity))
    }

    /// Creates an account through the provider and stores the identity.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the session is left unchanged.
    pub fn sign_up(
        &mut self,
        provider: &mut dyn IdentityProvider,
        sign_up: SignUp,
    ) -> Result<&Identity> {
        let identity = provider.register(sign_up)?;
        Ok(self.identity.insert(identity))
    }

    /// Tears the session down.
    ///
    /// The local identity is dropped even if the provider call fails.
    ///
    /// # Errors
    ///
    /// Returns the provider's error after clearing the local identity.
    pub fn sign_out(&mut self, provider: &mut dyn IdentityProvider) -> Result<()> {
        let previous = self.identity.take();
        tracing::debug!(
            user_id = ?previous.as_ref().map(|who| &who.user_id),
            "signing out"
        );
        provider.deauthenticate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryIdentityProvider;

    #[test]
    fn lifecycle() {
        let mut provider = MemoryIdentityProvider::new();
        let mut session = AuthSession::init(&provider);
        assert!(!session.is_authenticated());

        let user_id = session
            .sign_up(
                &mut provider,
                SignUp {
                    name: "Ana".into(),
                    email: "ana@example.com".into(),
                    password: "secret1".into(),
                    phone: None,
                },
            )
            .unwrap()
            .user_id
            .clone();
        assert_eq!(session.user_id(), Some(user_id.as_str()));

        let restored = AuthSession::init(&provider);
        assert_eq!(restored, session);

        session.sign_out(&mut provider).unwrap();
        assert!(session.identity().is_none());
        assert!(!AuthSession::init(&provider).is_authenticated());
    }

    #[test]
    fn failed_sign_in_keeps_previous_state() {
        let mut provider = MemoryIdentityProvider::new();
        let mut session = AuthSession::anonymous();
        assert!(session
            .sign_in(&mut provider, "ghost@example.com", "whatever")
            .is_err());
        assert!(!session.is_authenticated());
    }
}

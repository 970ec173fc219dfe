//! Hosted identity provider boundary.
//!
//! The provider's protocol is opaque to this crate; everything behind this
//! trait is "the identity SDK". Failures crossing this boundary are
//! normalized to "not authenticated" by [`crate::auth::AuthSessionStore`].

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use cartwheel_core::UserIdentity;

/// Failure reported by the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider call itself failed.
    #[error("identity provider error: {0}")]
    Provider(String),

    /// The provider answered but without the requested data.
    #[error("identity provider returned no {0}")]
    Missing(&'static str),
}

/// The operations the client needs from a hosted identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Username of the currently signed-in user, `None` when signed out.
    async fn current_user(&self) -> Result<Option<String>, AuthError>;

    /// A fresh ID token for the current session.
    async fn fetch_id_token(&self) -> Result<SecretString, AuthError>;

    /// Identity attributes of the current user.
    async fn fetch_user_attributes(&self) -> Result<UserIdentity, AuthError>;

    /// Terminate the hosted session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Provider backed by a pre-issued token and fixed identity.
///
/// Used by the CLI (token from configuration) and by tests. Sign-out flips a
/// flag so subsequent `current_user` calls report signed-out, mirroring how
/// a hosted session behaves after revocation.
pub struct StaticTokenProvider {
    identity: UserIdentity,
    token: SecretString,
    signed_out: AtomicBool,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(token: SecretString, identity: UserIdentity) -> Self {
        Self {
            identity,
            token,
            signed_out: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn current_user(&self) -> Result<Option<String>, AuthError> {
        if self.signed_out.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(self.identity.username.clone()))
    }

    async fn fetch_id_token(&self) -> Result<SecretString, AuthError> {
        if self.signed_out.load(Ordering::SeqCst) {
            return Err(AuthError::Missing("id token"));
        }
        Ok(SecretString::from(self.token.expose_secret().to_string()))
    }

    async fn fetch_user_attributes(&self) -> Result<UserIdentity, AuthError> {
        if self.signed_out.load(Ordering::SeqCst) {
            return Err(AuthError::Missing("user attributes"));
        }
        Ok(self.identity.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.signed_out.store(true, Ordering::SeqCst);
        Ok(())
    }
}

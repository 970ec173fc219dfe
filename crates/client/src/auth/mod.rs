//! Auth session store: local view of the hosted identity session.
//!
//! Holds the authenticated identity and its bearer token as one unit. The
//! two fields are always written together, so observers never see a token
//! without a user or vice versa.

mod provider;

pub use provider::{AuthError, IdentityProvider, StaticTokenProvider};

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::SecretString;

use cartwheel_core::UserIdentity;

#[derive(Default)]
struct AuthState {
    user: Option<UserIdentity>,
    id_token: Option<SecretString>,
}

/// Shared, cloneable handle to the current auth session.
#[derive(Clone)]
pub struct AuthSessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    state: RwLock<AuthState>,
}

impl AuthSessionStore {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                state: RwLock::new(AuthState::default()),
            }),
        }
    }

    /// Resolve the store to the provider's current remote state.
    ///
    /// Queries the provider for the signed-in user; when one exists, fetches
    /// the ID token and the user attributes concurrently and installs both
    /// atomically, returning `true`. Any failure at any stage (no user,
    /// token fetch failed, attribute fetch failed) clears the store and
    /// returns `false` — provider errors are absorbed here, never raised.
    ///
    /// Idempotent: repeated calls against unchanged remote state converge on
    /// the same store contents.
    pub async fn check_auth(&self) -> bool {
        match self.refresh().await {
            Ok(authenticated) => authenticated,
            Err(err) => {
                tracing::warn!(error = %err, "auth check failed");
                self.clear();
                false
            }
        }
    }

    async fn refresh(&self) -> Result<bool, AuthError> {
        let Some(_username) = self.inner.provider.current_user().await? else {
            self.clear();
            return Ok(false);
        };

        let (token, attributes) = tokio::join!(
            self.inner.provider.fetch_id_token(),
            self.inner.provider.fetch_user_attributes(),
        );
        let (token, attributes) = (token?, attributes?);

        *self.write_state() = AuthState {
            user: Some(attributes),
            id_token: Some(token),
        };
        Ok(true)
    }

    /// Sign out remotely, then clear local state unconditionally.
    ///
    /// Local state never depends on the remote call succeeding; a revoked
    /// session must not leave the client stuck authenticated.
    pub async fn logout(&self) {
        if let Err(err) = self.inner.provider.sign_out().await {
            tracing::warn!(error = %err, "remote sign-out failed, clearing local session anyway");
        }
        self.clear();
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_state().user.is_some()
    }

    /// Current identity, when authenticated.
    #[must_use]
    pub fn user(&self) -> Option<UserIdentity> {
        self.read_state().user.clone()
    }

    /// Current bearer token, when authenticated.
    #[must_use]
    pub fn id_token(&self) -> Option<SecretString> {
        self.read_state().id_token.clone()
    }

    fn clear(&self) {
        *self.write_state() = AuthState::default();
    }

    fn read_state(&self) -> RwLockReadGuard<'_, AuthState> {
        match self.inner.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AuthState> {
        match self.inner.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

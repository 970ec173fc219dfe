//! Failure hooks: side effects that run when a request fails.
//!
//! The client invokes these in order for every failed outcome, then still
//! returns the original error to the caller. Keeping each side effect as its
//! own named handler lets them be tested without staging a real 401.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::auth::AuthSessionStore;
use crate::notify::ErrorNotifications;

/// A failed request outcome as seen by the hooks.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    /// HTTP status, `None` for transport-level failures.
    pub status: Option<StatusCode>,
    /// User-facing message, already extracted from the response body.
    pub message: String,
}

impl ApiFailure {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(StatusCode::UNAUTHORIZED)
    }
}

/// One ordered step of the failure pipeline.
#[async_trait]
pub trait FailureHook: Send + Sync {
    async fn on_failure(&self, failure: &ApiFailure);
}

/// Where to send the user when their session is gone.
pub trait Navigator: Send + Sync {
    /// Perform the host's equivalent of a redirect to the login route.
    fn redirect_to_login(&self);
}

/// On a 401: force a local logout, then redirect to login.
///
/// Recovery is not attempted; the 401 error still reaches the caller after
/// this hook runs.
pub struct ForcedLogoutHook {
    store: AuthSessionStore,
    navigator: std::sync::Arc<dyn Navigator>,
}

impl ForcedLogoutHook {
    #[must_use]
    pub fn new(store: AuthSessionStore, navigator: std::sync::Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }
}

#[async_trait]
impl FailureHook for ForcedLogoutHook {
    async fn on_failure(&self, failure: &ApiFailure) {
        if !failure.is_unauthorized() {
            return;
        }
        tracing::info!("session rejected by backend, forcing logout");
        self.store.logout().await;
        self.navigator.redirect_to_login();
    }
}

/// Broadcasts every failure as a user-facing notification.
pub struct ErrorNotifierHook {
    notifications: ErrorNotifications,
}

impl ErrorNotifierHook {
    #[must_use]
    pub const fn new(notifications: ErrorNotifications) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl FailureHook for ErrorNotifierHook {
    async fn on_failure(&self, failure: &ApiFailure) {
        self.notifications.publish(failure.message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use cartwheel_core::UserIdentity;
    use secrecy::SecretString;

    use crate::auth::StaticTokenProvider;
    use crate::notify::GENERIC_ERROR_MESSAGE;

    struct CountingNavigator {
        redirects: AtomicUsize,
    }

    impl Navigator for CountingNavigator {
        fn redirect_to_login(&self) {
            self.redirects.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn authenticated_store() -> AuthSessionStore {
        let identity = UserIdentity {
            username: "jo".to_string(),
            email: "jo@example.com".to_string(),
            sub: "sub-1".to_string(),
        };
        let store = AuthSessionStore::new(Arc::new(StaticTokenProvider::new(
            SecretString::from("tok"),
            identity,
        )));
        assert!(store.check_auth().await);
        store
    }

    #[tokio::test]
    async fn forced_logout_fires_only_on_401() {
        let store = authenticated_store().await;
        let navigator = Arc::new(CountingNavigator {
            redirects: AtomicUsize::new(0),
        });
        let hook = ForcedLogoutHook::new(store.clone(), navigator.clone());

        hook.on_failure(&ApiFailure {
            status: Some(StatusCode::BAD_REQUEST),
            message: GENERIC_ERROR_MESSAGE.to_string(),
        })
        .await;
        assert!(store.is_authenticated());
        assert_eq!(navigator.redirects.load(Ordering::SeqCst), 0);

        hook.on_failure(&ApiFailure {
            status: Some(StatusCode::UNAUTHORIZED),
            message: GENERIC_ERROR_MESSAGE.to_string(),
        })
        .await;
        assert!(!store.is_authenticated());
        assert!(store.id_token().is_none());
        assert_eq!(navigator.redirects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn notifier_publishes_every_failure() {
        let notifications = ErrorNotifications::new();
        let mut rx = notifications.subscribe();
        let hook = ErrorNotifierHook::new(notifications);

        hook.on_failure(&ApiFailure {
            status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            message: "Coupon expired".to_string(),
        })
        .await;

        assert_eq!(rx.recv().await.expect("notification").message, "Coupon expired");
    }
}

//! Outbound request interceptors.
//!
//! The client applies these in order to every request before it is sent.
//! Each one is a small, independently testable header transformation; an
//! error here fails the request without reaching the network.

use std::collections::HashMap;

use opentelemetry::propagation::TextMapPropagator;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::auth::AuthSessionStore;
use crate::error::ApiError;
use crate::session::SessionId;

/// Correlation header carried on every request, login state or not.
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// One ordered step of the outbound pipeline.
pub trait RequestInterceptor: Send + Sync {
    /// Mutate the headers of an outgoing request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Header`] when a value cannot be encoded; the
    /// request is then not sent and the error propagates unchanged.
    fn apply(&self, headers: &mut HeaderMap) -> Result<(), ApiError>;
}

/// Attaches the auth store's ID token as the `Authorization` value.
///
/// The token is sent as-is, with no `Bearer` scheme prefix; that is the
/// backend's wire contract. Unauthenticated requests go out without the
/// header.
pub struct AuthHeaderInterceptor {
    store: AuthSessionStore,
}

impl AuthHeaderInterceptor {
    #[must_use]
    pub const fn new(store: AuthSessionStore) -> Self {
        Self { store }
    }
}

impl RequestInterceptor for AuthHeaderInterceptor {
    fn apply(&self, headers: &mut HeaderMap) -> Result<(), ApiError> {
        if let Some(token) = self.store.id_token() {
            let value = HeaderValue::from_str(token.expose_secret())
                .map_err(|e| ApiError::Header(format!("invalid id token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

/// Attaches the per-session correlation id as `x-session-id`.
pub struct SessionHeaderInterceptor {
    session_id: SessionId,
}

impl SessionHeaderInterceptor {
    #[must_use]
    pub const fn new(session_id: SessionId) -> Self {
        Self { session_id }
    }
}

impl RequestInterceptor for SessionHeaderInterceptor {
    fn apply(&self, headers: &mut HeaderMap) -> Result<(), ApiError> {
        let value = HeaderValue::from_str(self.session_id.as_str())
            .map_err(|e| ApiError::Header(format!("invalid session id: {e}")))?;
        headers.insert(SESSION_ID_HEADER, value);
        Ok(())
    }
}

/// Injects the current span's W3C trace context (`traceparent` and friends)
/// so the backend can join client spans into its traces. Applied
/// unconditionally; with no active span it simply adds nothing.
pub struct TraceContextInterceptor;

impl RequestInterceptor for TraceContextInterceptor {
    fn apply(&self, headers: &mut HeaderMap) -> Result<(), ApiError> {
        let mut carrier = HashMap::new();
        TraceContextPropagator::new()
            .inject_context(&tracing::Span::current().context(), &mut carrier);

        for (key, value) in carrier {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ApiError::Header(format!("invalid trace header name: {e}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| ApiError::Header(format!("invalid trace header value: {e}")))?;
            headers.insert(name, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use cartwheel_core::UserIdentity;
    use secrecy::SecretString;

    use crate::auth::StaticTokenProvider;
    use crate::session::{MemoryStorage, SessionStorage};

    fn authenticated_store() -> AuthSessionStore {
        let identity = UserIdentity {
            username: "jo".to_string(),
            email: "jo@example.com".to_string(),
            sub: "sub-1".to_string(),
        };
        AuthSessionStore::new(Arc::new(StaticTokenProvider::new(
            SecretString::from("raw-token-value"),
            identity,
        )))
    }

    #[tokio::test]
    async fn auth_interceptor_sends_raw_token() {
        let store = authenticated_store();
        assert!(store.check_auth().await);

        let mut headers = HeaderMap::new();
        AuthHeaderInterceptor::new(store)
            .apply(&mut headers)
            .expect("apply");

        // Raw token, no "Bearer " prefix.
        assert_eq!(
            headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("raw-token-value")
        );
    }

    #[tokio::test]
    async fn auth_interceptor_skips_header_when_signed_out() {
        let store = authenticated_store();

        let mut headers = HeaderMap::new();
        AuthHeaderInterceptor::new(store)
            .apply(&mut headers)
            .expect("apply");

        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn session_interceptor_always_sets_header() {
        let storage = MemoryStorage::new();
        storage.put("app_session_id", "fixed-session").expect("put");
        let session_id = SessionId::load_or_generate(&storage);

        let mut headers = HeaderMap::new();
        SessionHeaderInterceptor::new(session_id)
            .apply(&mut headers)
            .expect("apply");

        assert_eq!(
            headers.get(SESSION_ID_HEADER).and_then(|v| v.to_str().ok()),
            Some("fixed-session")
        );
    }

    #[test]
    fn trace_interceptor_is_a_no_op_without_a_span() {
        let mut headers = HeaderMap::new();
        TraceContextInterceptor.apply(&mut headers).expect("apply");
        // No active span context, nothing to inject.
        assert!(headers.get("traceparent").is_none());
    }
}

//! Error types for the API access layer.
//!
//! Network and backend failures propagate to the caller as [`ApiError`]
//! after the client's failure hooks have run. Identity-provider failures
//! never surface here; they are absorbed inside the auth session store.

use thiserror::Error;

/// Errors surfaced by [`crate::http::ApiClient`] and the service facade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Backend answered 401; the forced-logout hook has already fired.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Request rejected client-side before it was sent.
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A request interceptor produced an unusable header value.
    #[error("Invalid header: {0}")]
    Header(String),
}

impl ApiError {
    /// HTTP status of the failure, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }
}

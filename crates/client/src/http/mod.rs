//! Authenticated HTTP client for the order-processing backend.
//!
//! Wraps `reqwest` with a fixed origin and two explicit pipelines composed
//! at construction time: ordered request interceptors (auth token, session
//! id, trace context) and ordered failure hooks (forced logout on 401,
//! error notification broadcast). Hooks are side effects only — the original
//! error always propagates to the caller, and nothing is retried.

mod hooks;
mod interceptors;

pub use hooks::{ApiFailure, ErrorNotifierHook, FailureHook, ForcedLogoutHook, Navigator};
pub use interceptors::{
    AuthHeaderInterceptor, RequestInterceptor, SESSION_ID_HEADER, SessionHeaderInterceptor,
    TraceContextInterceptor,
};

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::notify::GENERIC_ERROR_MESSAGE;

/// Default per-request timeout. The backend contract specifies none, so the
/// client imposes one to keep a hung call from hanging its caller forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the order-processing API.
///
/// Cheap to clone; all clones share the underlying connection pool and
/// pipelines.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    failure_hooks: Vec<Arc<dyn FailureHook>>,
}

/// Builder composing the interceptor and hook pipelines in order.
pub struct ApiClientBuilder {
    base_url: Url,
    timeout: Duration,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    failure_hooks: Vec<Arc<dyn FailureHook>>,
}

impl ApiClient {
    /// Start building a client for the given backend origin.
    #[must_use]
    pub fn builder(base_url: Url) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            request_interceptors: Vec::new(),
            failure_hooks: Vec::new(),
        }
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails at any stage; failure
    /// hooks have already run by the time the error is returned.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute::<(), T>(Method::GET, path, &[], None).await
    }

    /// `GET` a JSON resource with query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails at any stage.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.execute::<(), T>(Method::GET, path, query, None).await
    }

    /// `POST` a JSON body and parse a JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request fails at any stage.
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    async fn execute<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self
            .inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidInput(format!("invalid request path {path}: {e}")))?;

        // Outbound pipeline. An interceptor error propagates unchanged and
        // the failure hooks do not run; nothing was sent.
        let mut headers = HeaderMap::new();
        for interceptor in &self.inner.request_interceptors {
            interceptor.apply(&mut headers)?;
        }

        let mut request = self.inner.http.request(method, url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                // No response at all; hooks still get a generic failure.
                self.run_failure_hooks(&ApiFailure {
                    status: None,
                    message: GENERIC_ERROR_MESSAGE.to_string(),
                })
                .await;
                return Err(ApiError::Http(err));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body_text);
            self.run_failure_hooks(&ApiFailure {
                status: Some(status),
                message: message.clone(),
            })
            .await;

            return Err(if status == StatusCode::UNAUTHORIZED {
                ApiError::Unauthorized { message }
            } else {
                ApiError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn run_failure_hooks(&self, failure: &ApiFailure) {
        for hook in &self.inner.failure_hooks {
            hook.on_failure(failure).await;
        }
    }
}

impl ApiClientBuilder {
    /// Override the default per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Append a request interceptor; interceptors run in insertion order.
    #[must_use]
    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Append a failure hook; hooks run in insertion order.
    #[must_use]
    pub fn failure_hook(mut self, hook: impl FailureHook + 'static) -> Self {
        self.failure_hooks.push(Arc::new(hook));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying HTTP client fails to
    /// initialize.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: self.base_url,
                request_interceptors: self.request_interceptors,
                failure_hooks: self.failure_hooks,
            }),
        })
    }
}

/// Pull the user-facing message out of an error response body.
///
/// The backend convention is `{"error": "..."}`; anything else falls back
/// to the generic message.
fn extract_error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_backend_error_field() {
        assert_eq!(
            extract_error_message(r#"{"error": "Coupon expired"}"#),
            "Coupon expired"
        );
    }

    #[test]
    fn falls_back_on_missing_error_field() {
        assert_eq!(
            extract_error_message(r#"{"detail": "unrelated"}"#),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn falls_back_on_unparseable_body() {
        assert_eq!(extract_error_message("<html>502</html>"), GENERIC_ERROR_MESSAGE);
    }
}

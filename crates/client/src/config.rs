//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARTWHEEL_API_URL` - Backend origin (e.g., <https://api.example.com>)
//!
//! ## Optional
//! - `CARTWHEEL_API_TOKEN` - Pre-issued ID token for the static identity
//!   provider (CLI use)
//! - `CARTWHEEL_USERNAME` - Username for the static identity (default: cli)
//! - `CARTWHEEL_USER_EMAIL` - Email for the static identity
//! - `CARTWHEEL_USER_SUB` - Subject id for the static identity
//! - `CARTWHEEL_LOGIN_URL` - Login route used on forced logout (default: /login)
//! - `CARTWHEEL_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `CARTWHEEL_OTLP_ENDPOINT` - Span collector endpoint; export disabled when unset
//! - `CARTWHEEL_OTLP_API_KEY` - Collector API key
//! - `CARTWHEEL_SERVICE_NAME` - Service name on exported spans
//!   (default: order-processing-service)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use cartwheel_core::UserIdentity;

use crate::telemetry::OtlpSettings;

const DEFAULT_SERVICE_NAME: &str = "order-processing-service";
const DEFAULT_LOGIN_URL: &str = "/login";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend origin all API paths are resolved against
    pub api_url: Url,
    /// Pre-issued ID token, when running with the static identity provider
    pub api_token: Option<SecretString>,
    /// Identity attributes paired with the static token
    pub identity: UserIdentity,
    /// Login route the forced-logout handler points users at
    pub login_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Service name on exported spans
    pub service_name: String,
    /// Span export settings; `None` disables export
    pub otlp: Option<OtlpSettings>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("identity", &self.identity)
            .field("login_url", &self.login_url)
            .field("request_timeout", &self.request_timeout)
            .field("service_name", &self.service_name)
            .field("otlp", &self.otlp.as_ref().map(|o| o.endpoint.as_str()))
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("CARTWHEEL_API_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("CARTWHEEL_API_URL".to_string(), e.to_string()))?;

        let api_token = get_optional_env("CARTWHEEL_API_TOKEN").map(SecretString::from);

        let username = get_env_or_default("CARTWHEEL_USERNAME", "cli");
        let identity = UserIdentity {
            email: get_env_or_default("CARTWHEEL_USER_EMAIL", &format!("{username}@localhost")),
            sub: get_env_or_default("CARTWHEEL_USER_SUB", &username),
            username,
        };

        let login_url = get_env_or_default("CARTWHEEL_LOGIN_URL", DEFAULT_LOGIN_URL);

        let request_timeout = match get_optional_env("CARTWHEEL_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "CARTWHEEL_REQUEST_TIMEOUT_SECS".to_string(),
                    e.to_string(),
                )
            })?),
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let service_name = get_env_or_default("CARTWHEEL_SERVICE_NAME", DEFAULT_SERVICE_NAME);

        let otlp = get_optional_env("CARTWHEEL_OTLP_ENDPOINT").map(|endpoint| OtlpSettings {
            endpoint,
            api_key: get_optional_env("CARTWHEEL_OTLP_API_KEY").map(SecretString::from),
        });

        Ok(Self {
            api_url,
            api_token,
            identity,
            login_url,
            request_timeout,
            service_name,
            otlp,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_config() -> ClientConfig {
        ClientConfig {
            api_url: "https://api.example.com".parse().unwrap(),
            api_token: Some(SecretString::from("very-secret-token")),
            identity: UserIdentity {
                username: "cli".to_string(),
                email: "cli@localhost".to_string(),
                sub: "cli".to_string(),
            },
            login_url: DEFAULT_LOGIN_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            otlp: None,
        }
    }

    #[test]
    fn debug_redacts_api_token() {
        let config = sample_config();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://api.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("very-secret-token"));
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(
            sample_config().request_timeout,
            Duration::from_secs(30)
        );
    }
}

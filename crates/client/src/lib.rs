//! Client layer for the order-processing backend.
//!
//! The pieces compose explicitly, no globals:
//!
//! - [`http::ApiClient`] — authenticated HTTP client with ordered request
//!   interceptors and failure hooks
//! - [`auth::AuthSessionStore`] — cached identity snapshot over an
//!   [`auth::IdentityProvider`]
//! - [`session::SessionId`] — per-session correlation id
//! - [`services::OrderService`] — typed product/order/coupon facade, one
//!   span per operation
//! - [`telemetry::TelemetryConfig`] — subscriber and OTLP export bootstrap
//!
//! Wire everything together at startup:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cartwheel_client::auth::{AuthSessionStore, StaticTokenProvider};
//! use cartwheel_client::http::{
//!     ApiClient, AuthHeaderInterceptor, ErrorNotifierHook, ForcedLogoutHook,
//!     SessionHeaderInterceptor, TraceContextInterceptor,
//! };
//! use cartwheel_client::notify::ErrorNotifications;
//! use cartwheel_client::session::{MemoryStorage, SessionId};
//! use cartwheel_client::services::OrderService;
//! # use cartwheel_client::http::Navigator;
//! # struct NoNav;
//! # impl Navigator for NoNav { fn redirect_to_login(&self) {} }
//!
//! # async fn wire() -> Result<(), cartwheel_client::error::ApiError> {
//! let provider = Arc::new(StaticTokenProvider::new(
//!     "token".into(),
//!     cartwheel_core::UserIdentity {
//!         username: "demo".into(),
//!         email: "demo@example.com".into(),
//!         sub: "demo".into(),
//!     },
//! ));
//! let auth = AuthSessionStore::new(provider);
//! auth.check_auth().await;
//!
//! let storage = MemoryStorage::new();
//! let session_id = SessionId::load_or_generate(&storage);
//! let notifications = ErrorNotifications::new();
//!
//! let client = ApiClient::builder("https://api.example.com".parse().unwrap())
//!     .request_interceptor(AuthHeaderInterceptor::new(auth.clone()))
//!     .request_interceptor(SessionHeaderInterceptor::new(session_id))
//!     .request_interceptor(TraceContextInterceptor)
//!     .failure_hook(ForcedLogoutHook::new(auth.clone(), Arc::new(NoNav)))
//!     .failure_hook(ErrorNotifierHook::new(notifications.clone()))
//!     .build()?;
//!
//! let orders = OrderService::new(client);
//! let products = orders.list_products().await?;
//! # let _ = products;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod services;
pub mod session;
pub mod telemetry;

pub use auth::AuthSessionStore;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::ApiClient;
pub use services::OrderService;
pub use session::SessionId;

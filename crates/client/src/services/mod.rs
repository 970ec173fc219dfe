//! Typed service facades over the [`crate::http::ApiClient`].

pub mod orders;

pub use orders::OrderService;

//! Cartwheel Core - Shared wire types.
//!
//! This crate provides the types exchanged with the order-processing backend,
//! used by both the client library and the CLI:
//! - `client` - API access layer (HTTP, auth, facade)
//! - `cli` - Command-line consumer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and request/response payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

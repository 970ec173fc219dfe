//! Command implementations, one module per command group.

pub mod auth;
pub mod coupons;
pub mod orders;
pub mod products;

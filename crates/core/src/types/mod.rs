//! Core types for Cartwheel.
//!
//! This module provides type-safe wrappers for the order-processing API's
//! wire format. The backend owns the schemas; unknown fields on backend-owned
//! resources are preserved rather than dropped.

pub mod coupon;
pub mod id;
pub mod order;
pub mod product;
pub mod user;

pub use coupon::CouponValidation;
pub use id::*;
pub use order::{CreateOrderRequest, Order, OrderItem, OrderItemError, OrderPage, OrderReceipt};
pub use product::Product;
pub use user::UserIdentity;

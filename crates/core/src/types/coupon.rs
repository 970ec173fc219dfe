//! Coupon validation result from `POST /coupons/validate`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::CouponCode;

/// Outcome of a coupon validation. Transient, never persisted client-side.
///
/// An invalid coupon still arrives with HTTP 200; `valid: false` plus an
/// `error` message is the in-band rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponValidation {
    pub valid: bool,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_percentage: Option<Decimal>,
    #[serde(default)]
    pub coupon_code: Option<CouponCode>,
    #[serde(default)]
    pub error: Option<String>,
}

//! Order payloads for `POST /orders`, `GET /orders/{id}` and `GET /orders`.
//!
//! Orders are owned by the backend. The fields below cover what the client
//! reads; anything else the backend attaches to an order record survives a
//! round trip through `extra`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{CouponCode, OrderId};

/// Error building an order line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderItemError {
    /// Quantities must be positive, matching the backend's validation.
    #[error("item quantity must be positive")]
    ZeroQuantity,
}

/// A single order line as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: String,
    pub qty: u32,
    /// Unit price, when the caller carries it through from the catalog.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// Display name, carried through for order history rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl OrderItem {
    /// Create an order line, rejecting zero quantities up front.
    ///
    /// # Errors
    ///
    /// Returns [`OrderItemError::ZeroQuantity`] if `qty` is zero.
    pub fn new(sku: impl Into<String>, qty: u32) -> Result<Self, OrderItemError> {
        if qty == 0 {
            return Err(OrderItemError::ZeroQuantity);
        }
        Ok(Self {
            sku: sku.into(),
            qty,
            price: None,
            name: None,
        })
    }

    /// Attach a unit price to the line.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }
}

/// Body of `POST /orders`.
///
/// `coupon_code` is serialized even when absent (as `null`) to match the
/// backend contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItem>,
    pub coupon_code: Option<CouponCode>,
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_applied: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A stored order as returned by `GET /orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Backend-owned fields the client does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One page of order history from `GET /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    #[serde(default)]
    pub items: Vec<Order>,
    /// Opaque cursor for the next page, present only when more rows exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_order_request_serializes_null_coupon() {
        let request = CreateOrderRequest {
            items: vec![OrderItem::new("A", 2).expect("valid item")],
            coupon_code: None,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "items": [{"sku": "A", "qty": 2}],
                "coupon_code": null
            })
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert_eq!(OrderItem::new("A", 0), Err(OrderItemError::ZeroQuantity));
    }

    #[test]
    fn order_preserves_unknown_fields() {
        let json = r#"{
            "order_id": "01JF2Z3A4B",
            "status": "CREATED",
            "total_price": 99.5,
            "session_id": "abc-123",
            "user_email": "jo@example.com"
        }"#;

        let order: Order = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.order_id, OrderId::new("01JF2Z3A4B"));
        assert_eq!(order.status.as_deref(), Some("CREATED"));
        assert_eq!(
            order.extra.get("session_id"),
            Some(&serde_json::Value::String("abc-123".to_string()))
        );
    }

    #[test]
    fn order_page_parses_cursor() {
        let json = r#"{"items": [], "after": "eyJvcmRlcl9pZCI6ICJYIn0="}"#;
        let page: OrderPage = serde_json::from_str(json).expect("deserialize");
        assert!(page.items.is_empty());
        assert_eq!(page.after.as_deref(), Some("eyJvcmRlcl9pZCI6ICJYIn0="));
    }
}

//! Order/product service facade.
//!
//! Each operation opens one span named for the operation, performs exactly
//! one HTTP call, and annotates the span with attributes from its inputs and
//! outputs. Spans close on every exit path, including when the call fails:
//! the operation body is instrumented onto the span, so the close is tied to
//! the future's lifetime rather than to a happy path. Errors are never
//! handled here; they propagate to the caller after the client's failure
//! hooks have run. No retries — every call is attempted exactly once.

use tracing::Instrument;
use tracing::field::Empty;

use cartwheel_core::{
    CouponCode, CouponValidation, CreateOrderRequest, Order, OrderId, OrderItem, OrderPage,
    OrderReceipt, Product,
};

use crate::error::ApiError;
use crate::http::ApiClient;

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Facade for the product, order and coupon operations.
#[derive(Clone)]
pub struct OrderService {
    client: ApiClient,
}

impl OrderService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the product catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let span = tracing::info_span!("list_products", product.count = Empty);
        async {
            let products: Vec<Product> = self.client.get("/products").await?;
            tracing::Span::current().record("product.count", products.len());
            Ok(products)
        }
        .instrument(span)
        .await
    }

    /// Create an order from a non-empty item list and an optional coupon.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] for an empty item list (rejected
    /// before anything is sent), or [`ApiError`] if the request fails.
    pub async fn create_order(
        &self,
        items: Vec<OrderItem>,
        coupon_code: Option<CouponCode>,
    ) -> Result<OrderReceipt, ApiError> {
        let span = tracing::info_span!(
            "create_order",
            order.items_count = Empty,
            order.coupon_code = Empty,
            order.id = Empty,
        );
        async {
            if items.is_empty() {
                return Err(ApiError::InvalidInput(
                    "order must contain at least one item".to_string(),
                ));
            }

            // The backend matches coupon codes case-sensitively against
            // uppercase records; normalize before sending.
            let coupon_code = coupon_code.map(|code| code.to_uppercase());

            let current = tracing::Span::current();
            current.record("order.items_count", items.len());
            if let Some(code) = &coupon_code {
                current.record("order.coupon_code", code.as_str());
            }

            let request = CreateOrderRequest { items, coupon_code };
            let receipt: OrderReceipt = self.client.post("/orders", &request).await?;
            current.record("order.id", receipt.order_id.as_str());
            Ok(receipt)
        }
        .instrument(span)
        .await
    }

    /// Fetch one order by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the order is missing.
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, ApiError> {
        let span = tracing::info_span!(
            "get_order",
            order.id = %order_id,
            order.status = Empty,
        );
        async {
            let order: Order = self
                .client
                .get(&format!("/orders/{order_id}"))
                .await?;
            if let Some(status) = &order.status {
                tracing::Span::current().record("order.status", status.as_str());
            }
            Ok(order)
        }
        .instrument(span)
        .await
    }

    /// Fetch one page of order history, newest first.
    ///
    /// Defaults to [`DEFAULT_PAGE_SIZE`] rows; `after` is the opaque cursor
    /// from a previous page and is omitted from the query when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn list_orders(
        &self,
        page_size: Option<u32>,
        after: Option<String>,
    ) -> Result<OrderPage, ApiError> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let span = tracing::info_span!(
            "list_orders",
            pagination.page_size = page_size,
            pagination.after = Empty,
            orders.count = Empty,
        );
        async {
            let mut query = vec![("page_size", page_size.to_string())];
            if let Some(cursor) = &after {
                tracing::Span::current().record("pagination.after", cursor.as_str());
                query.push(("after", cursor.clone()));
            }

            let page: OrderPage = self.client.get_with_query("/orders", &query).await?;
            tracing::Span::current().record("orders.count", page.items.len());
            Ok(page)
        }
        .instrument(span)
        .await
    }

    /// Check a coupon without consuming it.
    ///
    /// An invalid coupon is not an error: the backend answers 200 with
    /// `valid: false` and an in-band message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn validate_coupon(
        &self,
        coupon_code: &CouponCode,
    ) -> Result<CouponValidation, ApiError> {
        let coupon_code = coupon_code.to_uppercase();
        let span = tracing::info_span!(
            "validate_coupon",
            coupon.code = %coupon_code,
            coupon.valid = Empty,
            coupon.discount = Empty,
        );
        async {
            let body = serde_json::json!({ "coupon_code": coupon_code });
            let result: CouponValidation =
                self.client.post("/coupons/validate", &body).await?;

            let current = tracing::Span::current();
            current.record("coupon.valid", result.valid);
            if let Some(discount) = result.discount_percentage {
                current.record("coupon.discount", tracing::field::display(discount));
            }
            Ok(result)
        }
        .instrument(span)
        .await
    }
}

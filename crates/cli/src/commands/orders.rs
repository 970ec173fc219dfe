//! `orders` command group.

use thiserror::Error;

use cartwheel_client::services::OrderService;
use cartwheel_core::{CouponCode, OrderId, OrderItem, OrderItemError};

/// Failure parsing a `SKU:QTY` order line argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemArgError {
    #[error("expected SKU:QTY, got `{0}`")]
    Malformed(String),
    #[error("invalid quantity in `{0}`")]
    BadQuantity(String),
    #[error(transparent)]
    Item(#[from] OrderItemError),
}

/// Parse one `--item SKU:QTY` argument.
fn parse_item(arg: &str) -> Result<OrderItem, ItemArgError> {
    let (sku, qty) = arg
        .rsplit_once(':')
        .ok_or_else(|| ItemArgError::Malformed(arg.to_string()))?;
    if sku.is_empty() {
        return Err(ItemArgError::Malformed(arg.to_string()));
    }
    let qty: u32 = qty
        .parse()
        .map_err(|_| ItemArgError::BadQuantity(arg.to_string()))?;
    Ok(OrderItem::new(sku, qty)?)
}

/// Create an order from `SKU:QTY` lines and an optional coupon.
pub async fn create(
    service: &OrderService,
    item_args: &[String],
    coupon: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = item_args
        .iter()
        .map(|arg| parse_item(arg))
        .collect::<Result<Vec<_>, _>>()?;
    let coupon_code = coupon.map(CouponCode::new);

    let receipt = service.create_order(items, coupon_code).await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}

/// Fetch and print one order.
pub async fn get(service: &OrderService, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let order = service.get_order(&OrderId::new(id)).await?;
    println!("{}", serde_json::to_string_pretty(&order)?);
    Ok(())
}

/// Fetch and print one page of order history.
pub async fn list(
    service: &OrderService,
    page_size: Option<u32>,
    after: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = service.list_orders(page_size, after).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

//! `coupons` command group.

use cartwheel_client::services::OrderService;
use cartwheel_core::CouponCode;

/// Validate a coupon and print the backend's verdict.
pub async fn validate(
    service: &OrderService,
    code: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = service.validate_coupon(&CouponCode::new(code)).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

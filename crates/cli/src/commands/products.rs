//! `products` command group.

use cartwheel_client::services::OrderService;

/// List the product catalog as pretty-printed JSON.
pub async fn list(service: &OrderService) -> Result<(), Box<dyn std::error::Error>> {
    let products = service.list_products().await?;
    println!("{}", serde_json::to_string_pretty(&products)?);
    Ok(())
}

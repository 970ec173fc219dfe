//! Catalog product as served by `GET /products`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product from the static catalog.
///
/// The backend serializes prices as JSON numbers, hence the float codec on
/// the `price` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Price in the currency's standard unit (dollars, not cents).
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL for display.
    pub image: Option<String>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_catalog_entry() {
        let json = r#"{
            "id": 1,
            "name": "Wireless Headphones",
            "description": "Premium noise-cancelling wireless headphones",
            "price": 299.99,
            "image": "https://example.com/headphones.png",
            "category": "Electronics"
        }"#;

        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.name, "Wireless Headphones");
        assert_eq!(product.price, Decimal::new(29999, 2));
    }

    #[test]
    fn serializes_price_as_number() {
        let product = Product {
            id: ProductId::new(5),
            name: "USB-C Hub".to_string(),
            description: "7-in-1 USB-C hub".to_string(),
            price: Decimal::new(4999, 2),
            image: None,
            category: Some("Accessories".to_string()),
        };

        let value = serde_json::to_value(&product).expect("serialize");
        assert!(value["price"].is_number());
    }
}

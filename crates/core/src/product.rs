//! The catalog product as the storefront renders it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A product loaded from the catalog.
///
/// Immutable once loaded for a session: cart lines and order snapshots copy
/// the fields they need rather than holding references back to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in rand; never negative.
    pub price: Decimal,
    /// Public URL of the product image, empty when none was uploaded.
    pub image_url: String,
    pub category: String,
    /// Ordered marketing bullet points.
    pub benefits: Vec<String>,
    /// Promoted in the specials section when set.
    pub is_special: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_product(name: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(Uuid::new_v4()),
            name: name.to_string(),
            description: String::new(),
            price,
            image_url: String::new(),
            category: "Bath Salts".to_string(),
            benefits: Vec::new(),
            is_special: false,
        }
    }

    #[test]
    fn test_product_serde_round_trip() {
        let product = sample_product("Lavender Soak", Decimal::new(12_900, 2));
        let json = serde_json::to_string(&product).expect("serialize");
        let back: Product = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, product);
    }
}

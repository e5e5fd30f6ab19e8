//! Row types for the named relations.
//!
//! Rows are deserialized tolerantly - nullable columns land as `Option` -
//! and converted to the stricter core types at the edge, defaulting absent
//! fields the way the storefront has always displayed them.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dimakatso_core::{CustomerDetails, OrderDraft, OrderStatus, Product, ProductId, StoreRole};

/// A row of the `products` relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub benefits: Option<Vec<String>>,
    pub is_special: Option<bool>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductRow {
    /// Convert into the domain product, defaulting absent columns.
    #[must_use]
    pub fn into_product(self) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description.unwrap_or_default(),
            // Unit prices are never negative; a bad row renders as free
            // rather than poisoning cart arithmetic.
            price: self.price.unwrap_or_default().max(Decimal::ZERO),
            image_url: self.image_url.unwrap_or_default(),
            category: self.category.unwrap_or_else(|| "General".to_string()),
            benefits: self.benefits.unwrap_or_default(),
            is_special: self.is_special.unwrap_or(false),
        }
    }
}

/// Patch/insert payload for the `products` relation.
///
/// `image_url` is optional so edits without a new upload leave the stored
/// image untouched.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPatch {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub benefits: Vec<String>,
    pub is_special: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A row of the `profiles` relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl ProfileRow {
    /// The parsed role, or `None` for an absent or unrecognized value.
    ///
    /// Role checks fail closed: an unparseable role is no role.
    #[must_use]
    pub fn role(&self) -> Option<StoreRole> {
        self.role
            .as_deref()
            .and_then(|raw| StoreRole::from_str(raw).ok())
    }
}

/// One embedded line of an order's `items` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Insert payload for the `orders` relation.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderRow {
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub items: Vec<OrderItemRow>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
}

impl NewOrderRow {
    /// Build the insert payload from a checkout draft.
    #[must_use]
    pub fn from_draft(user_id: Option<Uuid>, draft: &OrderDraft, status: OrderStatus) -> Self {
        let CustomerDetails {
            email,
            address,
            city,
            province,
            postal_code,
            ..
        } = draft.customer.clone();

        Self {
            user_id,
            customer_name: draft.customer.full_name(),
            email,
            address,
            city,
            state: province,
            zip: postal_code,
            items: draft
                .lines
                .iter()
                .map(|line| OrderItemRow {
                    id: line.id.as_uuid(),
                    name: line.name.clone(),
                    price: line.price,
                    quantity: line.quantity,
                })
                .collect(),
            subtotal: draft.subtotal,
            shipping: draft.shipping,
            total: draft.total,
            status,
        }
    }
}

/// A row of the `orders` relation as read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub items: Option<Vec<OrderItemRow>>,
    pub subtotal: Option<Decimal>,
    pub shipping: Option<Decimal>,
    pub total: Option<Decimal>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    /// "Name x qty" summary of the embedded lines, em-dash when empty.
    #[must_use]
    pub fn items_summary(&self) -> String {
        match self.items.as_deref() {
            None | Some([]) => "\u{2014}".to_string(),
            Some(items) => items
                .iter()
                .map(|item| format!("{} x {}", item.name, item.quantity))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dimakatso_core::Cart;

    fn sparse_product_row() -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            name: "Lavender Soak".to_string(),
            description: None,
            price: None,
            image_url: None,
            category: None,
            benefits: None,
            is_special: None,
            is_active: None,
            created_at: None,
        }
    }

    #[test]
    fn test_into_product_defaults_absent_columns() {
        let product = sparse_product_row().into_product();
        assert_eq!(product.description, "");
        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.category, "General");
        assert!(product.benefits.is_empty());
        assert!(!product.is_special);
    }

    #[test]
    fn test_into_product_clamps_negative_price() {
        let mut row = sparse_product_row();
        row.price = Some(Decimal::new(-500, 2));
        assert_eq!(row.into_product().price, Decimal::ZERO);
    }

    #[test]
    fn test_product_row_accepts_numeric_price_json() {
        let body = r#"{"id":"3f2e9c1a-0b5d-4f7e-9a1b-2c3d4e5f6a7b","name":"Lavender Soak","price":129.5}"#;
        let row: ProductRow = serde_json::from_str(body).unwrap();
        assert_eq!(row.price, Some(Decimal::new(1295, 1)));
    }

    #[test]
    fn test_profile_role_fails_closed_on_unknown_value() {
        let profile = ProfileRow {
            id: Uuid::new_v4(),
            email: None,
            role: Some("root".to_string()),
        };
        assert_eq!(profile.role(), None);

        let profile = ProfileRow {
            id: Uuid::new_v4(),
            email: None,
            role: None,
        };
        assert_eq!(profile.role(), None);
    }

    #[test]
    fn test_profile_role_parses_admin() {
        let profile = ProfileRow {
            id: Uuid::new_v4(),
            email: None,
            role: Some("admin".to_string()),
        };
        assert_eq!(profile.role(), Some(StoreRole::Admin));
    }

    #[test]
    fn test_new_order_row_from_draft() {
        let mut cart = Cart::new();
        cart.add_item(Product {
            id: ProductId::new(Uuid::new_v4()),
            name: "Lavender Soak".to_string(),
            description: String::new(),
            price: Decimal::new(12_900, 2),
            image_url: String::new(),
            category: "Bath Salts".to_string(),
            benefits: Vec::new(),
            is_special: false,
        });

        let draft = OrderDraft::new(
            &cart,
            CustomerDetails {
                email: "thandi@example.com".to_string(),
                first_name: "Thandi".to_string(),
                last_name: "Mokoena".to_string(),
                address: "12 Protea Road".to_string(),
                city: "Johannesburg".to_string(),
                province: "Gauteng".to_string(),
                postal_code: "2196".to_string(),
            },
        );

        let user_id = Uuid::new_v4();
        let row = NewOrderRow::from_draft(Some(user_id), &draft, OrderStatus::Paid);

        assert_eq!(row.customer_name, "Thandi Mokoena");
        assert_eq!(row.state, "Gauteng");
        assert_eq!(row.zip, "2196");
        assert_eq!(row.items.len(), 1);
        assert_eq!(row.items[0].quantity, 1);
        assert_eq!(row.total, draft.total);
        assert_eq!(row.status, OrderStatus::Paid);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["status"], "paid");
        assert_eq!(json["user_id"], serde_json::json!(user_id));
    }

    #[test]
    fn test_items_summary() {
        let mut order = OrderRow {
            id: Uuid::new_v4(),
            user_id: None,
            customer_name: None,
            email: None,
            address: None,
            city: None,
            state: None,
            zip: None,
            items: None,
            subtotal: None,
            shipping: None,
            total: None,
            status: None,
            created_at: None,
        };
        assert_eq!(order.items_summary(), "\u{2014}");

        order.items = Some(vec![
            OrderItemRow {
                id: Uuid::new_v4(),
                name: "Lavender Soak".to_string(),
                price: Decimal::new(12_900, 2),
                quantity: 2,
            },
            OrderItemRow {
                id: Uuid::new_v4(),
                name: "Citrus Scrub".to_string(),
                price: Decimal::new(8_550, 2),
                quantity: 1,
            },
        ]);
        assert_eq!(order.items_summary(), "Lavender Soak x 2, Citrus Scrub x 1");
    }

    #[test]
    fn test_product_patch_skips_absent_image() {
        let patch = ProductPatch {
            name: "Lavender Soak".to_string(),
            description: String::new(),
            price: Decimal::new(12_900, 2),
            category: "Bath Salts".to_string(),
            benefits: vec!["Calming".to_string()],
            is_special: true,
            is_active: true,
            image_url: None,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert!(json.get("image_url").is_none());
        assert_eq!(json["is_special"], true);
    }
}

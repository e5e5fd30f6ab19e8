//! Order drafts built from a cart at checkout.
//!
//! A draft embeds an immutable snapshot of the cart lines (id, name, price,
//! quantity) - not references to the live cart - so later cart mutations
//! cannot change what was ordered.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::ProductId;

/// Flat shipping fee applied to every order.
#[must_use]
pub fn shipping_fee() -> Decimal {
    Decimal::new(599, 2)
}

/// Snapshot of one cart line at the moment of checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Contact and shipping fields collected by the checkout form.
///
/// Payment-card fields are deliberately absent: they are captured by the
/// form but never stored or transmitted anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

impl CustomerDetails {
    /// Display name as stored on the order ("First Last", trimmed).
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// An order ready for persistence, with totals computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer: CustomerDetails,
    pub lines: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderDraft {
    /// Build a draft from the current cart contents.
    ///
    /// `subtotal` is the sum of price x quantity over the cart, `shipping`
    /// is the flat [`shipping_fee`], and `total = subtotal + shipping` -
    /// including for an empty cart, where the total is just the fee.
    #[must_use]
    pub fn new(cart: &Cart, customer: CustomerDetails) -> Self {
        let lines: Vec<OrderLine> = cart
            .lines()
            .iter()
            .map(|line| OrderLine {
                id: line.product.id,
                name: line.product.name.clone(),
                price: line.product.price,
                quantity: line.quantity,
            })
            .collect();

        let subtotal = cart.subtotal();
        let shipping = shipping_fee();

        Self {
            customer,
            lines,
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;
    use uuid::Uuid;

    fn details() -> CustomerDetails {
        CustomerDetails {
            email: "thandi@example.com".to_string(),
            first_name: "Thandi".to_string(),
            last_name: "Mokoena".to_string(),
            address: "12 Protea Road".to_string(),
            city: "Johannesburg".to_string(),
            province: "Gauteng".to_string(),
            postal_code: "2196".to_string(),
        }
    }

    fn product(name: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(Uuid::new_v4()),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(cents, 2),
            image_url: String::new(),
            category: "Bath Salts".to_string(),
            benefits: Vec::new(),
            is_special: false,
        }
    }

    #[test]
    fn test_total_is_subtotal_plus_shipping() {
        let mut cart = Cart::new();
        cart.add_item(product("Lavender Soak", 12_900));
        cart.add_item(product("Citrus Scrub", 8_550));

        let draft = OrderDraft::new(&cart, details());

        assert_eq!(draft.subtotal, Decimal::new(21_450, 2));
        assert_eq!(draft.shipping, shipping_fee());
        assert_eq!(draft.total, Decimal::new(21_450, 2) + shipping_fee());
    }

    #[test]
    fn test_empty_cart_total_is_just_shipping() {
        let draft = OrderDraft::new(&Cart::new(), details());
        assert_eq!(draft.subtotal, Decimal::ZERO);
        assert_eq!(draft.total, shipping_fee());
        assert!(draft.lines.is_empty());
    }

    #[test]
    fn test_snapshot_is_independent_of_later_cart_mutations() {
        let mut cart = Cart::new();
        let soak = product("Lavender Soak", 12_900);
        let id = soak.id;
        cart.add_item(soak);

        let draft = OrderDraft::new(&cart, details());

        cart.update_quantity(id, 10);
        cart.remove_item(id);

        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].quantity, 1);
        assert_eq!(draft.subtotal, Decimal::new(12_900, 2));
    }

    #[test]
    fn test_full_name_trims_missing_parts() {
        let mut customer = details();
        customer.last_name = String::new();
        assert_eq!(customer.full_name(), "Thandi");
    }
}

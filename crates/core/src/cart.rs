//! In-memory shopping cart.
//!
//! The cart is an ordered collection of product/quantity lines, held in the
//! visitor's session. At most one line exists per product id; repeat adds
//! increment the existing line. Nothing here touches the network - the cart
//! is only persisted (as an order snapshot) at checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::ProductId;

/// One product/quantity pairing within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    /// Always >= 1; a line with quantity zero never exists.
    pub quantity: u32,
}

impl CartLine {
    /// Price x quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Ordered collection of cart lines; insertion order is the add order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines in add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`.
    ///
    /// If a line for the product already exists its quantity is incremented;
    /// otherwise a new line with quantity 1 is appended. Always succeeds.
    pub fn add_item(&mut self, product: Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                product,
                quantity: 1,
            });
        }
    }

    /// Replace the quantity of the line for `product_id`.
    ///
    /// A no-op when `quantity < 1`: dropping a line must go through
    /// [`Cart::remove_item`], never through the quantity field. Also a no-op
    /// when no line exists for the product.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity < 1 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Drop the line for `product_id` if present.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product.id != product_id);
    }

    /// Total number of units across all lines (the badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of price x quantity across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Empty the cart (successful checkout, logout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

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
    fn test_adding_same_product_twice_merges_lines() {
        let mut cart = Cart::new();
        let soak = product("Lavender Soak", 12_900);

        cart.add_item(soak.clone());
        cart.add_item(soak);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        let first = product("Rose Quartz Salts", 9_900);
        let second = product("Eucalyptus Recovery", 11_500);

        cart.add_item(first.clone());
        cart.add_item(second);
        cart.add_item(first.clone());

        assert_eq!(cart.lines()[0].product.id, first.id);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_update_quantity_zero_is_a_no_op() {
        let mut cart = Cart::new();
        let soak = product("Lavender Soak", 12_900);
        let id = soak.id;
        cart.add_item(soak);

        cart.update_quantity(id, 0);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity_replaces() {
        let mut cart = Cart::new();
        let soak = product("Lavender Soak", 12_900);
        let id = soak.id;
        cart.add_item(soak);

        cart.update_quantity(id, 5);

        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_update_quantity_unknown_product_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add_item(product("Lavender Soak", 12_900));

        cart.update_quantity(ProductId::new(Uuid::new_v4()), 3);

        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_only_explicit_removal_deletes() {
        let mut cart = Cart::new();
        let soak = product("Lavender Soak", 12_900);
        let id = soak.id;
        cart.add_item(soak);

        cart.remove_item(id);
        assert!(cart.is_empty());

        // Removing again is a no-op.
        cart.remove_item(id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_sums_price_times_quantity() {
        let mut cart = Cart::new();
        let soak = product("Lavender Soak", 12_900); // R129.00
        let scrub = product("Citrus Scrub", 8_550); // R85.50
        cart.add_item(soak.clone());
        cart.add_item(soak);
        cart.add_item(scrub);

        // 2 x 129.00 + 1 x 85.50
        assert_eq!(cart.subtotal(), Decimal::new(34_350, 2));
    }

    #[test]
    fn test_empty_cart_subtotal_is_zero() {
        let cart = Cart::new();
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_clear_empties_all_lines() {
        let mut cart = Cart::new();
        cart.add_item(product("Lavender Soak", 12_900));
        cart.add_item(product("Citrus Scrub", 8_550));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }
}

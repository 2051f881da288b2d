//! Shopping cart reducer.
//!
//! Items are kept in insertion order; adding a product that is already in
//! the cart bumps its quantity instead of adding a second line.

use super::*;
use crate::catalog::{Price, Product};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
}

impl CartItem {
    pub fn total(&self) -> Price {
        self.price * self.quantity
    }
}

#[derive(Debug, Default, Clone)]
pub struct ShoppingCart {
    items: Vec<CartItem>,
}

impl ShoppingCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of all quantities.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add_item(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity += 1;
            trace!(id = %product.id, quantity = item.quantity, "Incremented cart item");
        } else {
            self.items.push(CartItem {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity: 1,
            });
            trace!(id = %product.id, "Added cart item");
        }
    }

    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    /// Sets the quantity of an item; a quantity of zero removes it.
    /// Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(id);
        } else if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        Product::new("1", "Widget", Price::from_cents(999))
    }

    fn gadget() -> Product {
        Product::new("2", "Gadget", Price::from_cents(1999))
    }

    #[test]
    fn test_starts_empty() {
        let cart = ShoppingCart::new();
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.subtotal(), Price::default());
        assert!(cart.is_empty());
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_add_new_product() {
        let mut cart = ShoppingCart::new();
        cart.add_item(&widget());

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].name, "Widget");
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_existing_product_increments_quantity() {
        let mut cart = ShoppingCart::new();
        for _ in 0..3 {
            cart.add_item(&widget());
        }

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_multiple_products() {
        let mut cart = ShoppingCart::new();
        cart.add_item(&widget());
        cart.add_item(&gadget());
        cart.add_item(&widget());

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = ShoppingCart::new();
        cart.add_item(&widget());
        cart.add_item(&gadget());

        cart.remove_item("1");

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].id, "2");
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = ShoppingCart::new();
        cart.add_item(&widget());

        cart.update_quantity("1", 5);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.item_count(), 5);

        cart.update_quantity("missing", 2);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = ShoppingCart::new();
        cart.add_item(&widget());

        cart.update_quantity("1", 0);

        assert!(cart.items().is_empty());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = ShoppingCart::new();
        cart.add_item(&widget());
        cart.add_item(&gadget());

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_subtotal() {
        let mut cart = ShoppingCart::new();
        cart.add_item(&Product::new("1", "Widget", Price::from_cents(1000)));
        cart.add_item(&Product::new("2", "Gadget", Price::from_cents(2000)));
        cart.add_item(&Product::new("1", "Widget", Price::from_cents(1000)));

        // 10 * 2 + 20 * 1
        assert_eq!(cart.subtotal(), Price::from_cents(4000));
    }
}

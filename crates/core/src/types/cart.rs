//! The cart collection and its mutations.
//!
//! [`Cart`] is the value the store publishes and persists. All three
//! mutations are a linear search by [`ProductId`] followed by a quantity
//! change; lookup misses leave the collection untouched and report `false`
//! so the caller can skip publishing and persisting.

use serde::{Deserialize, Serialize};

use super::{LineItem, Product, ProductId};

/// Ordered, id-unique list of line items.
///
/// Serializes as a bare JSON array of [`LineItem`]s, which is the snapshot
/// layout kept in storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<LineItem>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Put one unit of `product` in the cart.
    ///
    /// An existing line with the same id gains one unit and keeps its stored
    /// title, image and price. Otherwise a new line with quantity 1 is
    /// appended.
    pub fn add(&mut self, product: Product) {
        if let Some(line) = self.get_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.0.push(LineItem::from_product(product));
        }
    }

    /// Add one unit to the line for `id`. Returns `false` on a lookup miss.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        self.adjust(id, 1)
    }

    /// Remove one unit from the line for `id`. Returns `false` on a lookup miss.
    ///
    /// No floor: the quantity may reach zero or go negative and the line stays.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        self.adjust(id, -1)
    }

    fn adjust(&mut self, id: &ProductId, delta: i64) -> bool {
        match self.get_mut(id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(delta);
                true
            }
            None => false,
        }
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.0.iter().find(|line| line.id == *id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.0.iter_mut().find(|line| line.id == *id)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.0
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all line quantities (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.0
            .iter()
            .fold(0_i64, |total, line| total.saturating_add(line.quantity))
    }

    /// Consume the cart and return its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::UnitPrice;

    fn product(id: &str, title: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            image_url: format!("https://cdn.example/{id}.png"),
            price: UnitPrice::from_cents(cents),
        }
    }

    fn quantity(cart: &Cart, id: &str) -> i64 {
        cart.get(&ProductId::new(id)).unwrap().quantity
    }

    #[test]
    fn test_add_new_product_appends_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add(product("p1", "Shirt", 1000));
        cart.add(product("p2", "Hat", 500));

        assert_eq!(cart.len(), 2);
        let first = &cart.items()[0];
        assert_eq!(first.id, ProductId::new("p1"));
        assert_eq!(first.title, "Shirt");
        assert_eq!(first.image_url, "https://cdn.example/p1.png");
        assert_eq!(first.price, UnitPrice::from_cents(1000));
        assert_eq!(first.quantity, 1);
        assert_eq!(cart.items()[1].id, ProductId::new("p2"));
    }

    #[test]
    fn test_add_existing_product_bumps_quantity_only() {
        let mut cart = Cart::new();
        cart.add(product("p1", "Shirt", 1000));
        cart.add(product("p1", "Renamed Shirt", 9999));

        assert_eq!(cart.len(), 1);
        let line = cart.get(&ProductId::new("p1")).unwrap();
        assert_eq!(line.quantity, 2);
        // Stored fields are left as they were
        assert_eq!(line.title, "Shirt");
        assert_eq!(line.price, UnitPrice::from_cents(1000));
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(product("a", "A", 100));
        cart.add(product("b", "B", 100));
        cart.add(product("a", "A", 100));
        cart.add(product("c", "C", 100));

        let ids: Vec<&str> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_increment_existing() {
        let mut cart = Cart::new();
        cart.add(product("p1", "Shirt", 1000));

        assert!(cart.increment(&ProductId::new("p1")));
        assert_eq!(quantity(&cart, "p1"), 2);
    }

    #[test]
    fn test_increment_missing_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.increment(&ProductId::new("unknown")));
        assert!(cart.is_empty());

        cart.add(product("p1", "Shirt", 1000));
        let before = cart.clone();
        assert!(!cart.increment(&ProductId::new("unknown")));
        assert!(!cart.increment(&ProductId::new("unknown")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("p1", "Shirt", 1000));
        let before = cart.clone();

        assert!(!cart.decrement(&ProductId::new("p2")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_has_no_floor() {
        let mut cart = Cart::new();
        cart.add(product("p1", "Shirt", 1000));

        assert!(cart.decrement(&ProductId::new("p1")));
        assert_eq!(quantity(&cart, "p1"), 0);
        assert!(cart.decrement(&ProductId::new("p1")));
        assert_eq!(quantity(&cart, "p1"), -1);
        // The line is never removed
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_shirt_scenario() {
        let mut cart = Cart::new();
        let shirt = product("p1", "Shirt", 1000);

        cart.add(shirt.clone());
        assert_eq!(quantity(&cart, "p1"), 1);
        cart.add(shirt);
        assert_eq!(quantity(&cart, "p1"), 2);
        cart.decrement(&ProductId::new("p1"));
        assert_eq!(quantity(&cart, "p1"), 1);
        cart.decrement(&ProductId::new("p1"));
        assert_eq!(quantity(&cart, "p1"), 0);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::new();
        assert_eq!(cart.item_count(), 0);

        cart.add(product("p1", "Shirt", 1000));
        cart.add(product("p1", "Shirt", 1000));
        cart.add(product("p2", "Hat", 500));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_snapshot_is_bare_array() {
        let mut cart = Cart::new();
        cart.add(product("p1", "Shirt", 1000));

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_empty_snapshot() {
        let cart: Cart = serde_json::from_str("[]").unwrap();
        assert!(cart.is_empty());
        assert_eq!(serde_json::to_string(&Cart::new()).unwrap(), "[]");
    }
}

//! # Cart
//!
//! The in-memory line mapping and every rule that changes it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Page Action              Cart Method              Line Change          │
//! │  ───────────              ───────────              ───────────          │
//! │                                                                         │
//! │  "Agregar al pedido" ───► add() ────────────────► qty += 1 or new line │
//! │                                                                         │
//! │  [-] / [+] ──────────────► update_quantity() ───► qty = n (n<=0 drops) │
//! │                                                                         │
//! │  Trash icon ─────────────► remove() ────────────► line dropped         │
//! │                                                                         │
//! │  Criolla [-] / [+] ──────► set_condiment_qty() ─► clamp to [0, qty]    │
//! │                                                                         │
//! │  "Vaciar carrito" ───────► clear() ─────────────► no lines             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by key; the key depends only on (product id, variant)
//! - A line never holds quantity <= 0, it is removed instead
//! - Lines keep insertion order for display
//!
//! This module does no I/O. Persistence and notification live in
//! `panzo-store`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::money::Money;
use crate::types::{CartLine, CartTotals, ProductId, ProductSnapshot, Variant};

// =============================================================================
// Line Keys
// =============================================================================

/// Lowercases a variant label and collapses each whitespace run into `-`.
///
/// ```rust
/// use panzo_core::cart::normalize_variant;
///
/// assert_eq!(normalize_variant("Pan  Árabe"), "pan-árabe");
/// ```
pub fn normalize_variant(variant_type: &str) -> String {
    let mut normalized = String::with_capacity(variant_type.len());
    let mut in_whitespace = false;

    for ch in variant_type.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                normalized.push('-');
            }
            in_whitespace = true;
        } else {
            normalized.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }

    normalized
}

/// Builds the line key for a (product, variant) pair: `"<id>-<variant>"`.
///
/// ```rust
/// use panzo_core::cart::line_key;
///
/// assert_eq!(line_key(1, "Pan Árabe"), "1-pan-árabe");
/// assert_eq!(line_key(9, "Unidad"), "9-unidad");
/// ```
pub fn line_key(product_id: ProductId, variant_type: &str) -> String {
    format!("{}-{}", product_id, normalize_variant(variant_type))
}

// =============================================================================
// Update Outcome
// =============================================================================

/// What `Cart::update_quantity` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// No line with that key; nothing changed.
    Missing,
    /// Requested quantity was <= 0, the line was dropped.
    Removed,
    /// Quantity set to the new value.
    Updated,
}

// =============================================================================
// Cart
// =============================================================================

/// The cart: an insertion-ordered mapping from line key to [`CartLine`].
///
/// Serializes as a JSON object keyed by line key, the `items` shape of the
/// persisted snapshot. Deserialization keeps the object's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a (product, variant) pair.
    ///
    /// ## Behavior
    /// - Same product + same variant already in cart: quantity + 1, condiment
    ///   count untouched
    /// - New combination: new line with quantity 1 and condiment count 0,
    ///   freezing name, image and price
    ///
    /// Returns the key of the affected line.
    pub fn add(&mut self, product: &ProductSnapshot, variant: &Variant) -> String {
        let key = line_key(product.id, &variant.variant_type);

        if let Some(line) = self.line_mut(&key) {
            line.quantity = line.quantity.saturating_add(1);
            return key;
        }

        self.lines.push(CartLine {
            key: key.clone(),
            product_id: product.id,
            product_name: product.name.clone(),
            product_image: product.image.clone(),
            variant_type: variant.variant_type.clone(),
            price: variant.price,
            quantity: 1,
            condiment_qty: 0,
        });
        key
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - Key not in cart: nothing happens
    /// - Quantity <= 0: removes the line
    /// - Otherwise the quantity is stored as given, with no upper bound. The
    ///   condiment count is NOT re-clamped and may end up above the quantity
    ///   until the next `set_condiment_qty`.
    pub fn update_quantity(&mut self, key: &str, quantity: i64) -> QuantityUpdate {
        let Some(index) = self.position(key) else {
            return QuantityUpdate::Missing;
        };

        if quantity <= 0 {
            self.lines.remove(index);
            return QuantityUpdate::Removed;
        }

        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        QuantityUpdate::Updated
    }

    /// Removes a line by key, returning it if it was present.
    pub fn remove(&mut self, key: &str) -> Option<CartLine> {
        self.position(key).map(|index| self.lines.remove(index))
    }

    /// Sets how many units of a line get the condiment, clamped to
    /// `[0, quantity]`.
    ///
    /// Returns the stored value, or `None` if the key is not in the cart.
    pub fn set_condiment_qty(&mut self, key: &str, condiment_qty: i64) -> Option<i64> {
        let line = self.line_mut(key)?;
        line.condiment_qty = condiment_qty.min(line.quantity).max(0);
        Some(line.condiment_qty)
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up a line by key.
    pub fn line(&self, key: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.key == key)
    }

    /// Sum of `price × quantity` over all lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines (the cart badge number).
    pub fn total_items(&self) -> i64 {
        self.lines
            .iter()
            .fold(0, |acc: i64, line| acc.saturating_add(line.quantity))
    }

    /// Returns the number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Totals summary for renderers.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.key == key)
    }

    fn line_mut(&mut self, key: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.key == key)
    }

    /// Inserts a line, replacing an existing line with the same key in place.
    fn upsert(&mut self, line: CartLine) {
        match self.position(&line.key) {
            Some(index) => self.lines[index] = line,
            None => self.lines.push(line),
        }
    }
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.len(),
            total_items: cart.total_items(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Serialization
// =============================================================================

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.lines.len()))?;
        for line in &self.lines {
            map.serialize_entry(&line.key, line)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CartVisitor)
    }
}

struct CartVisitor;

impl<'de> Visitor<'de> for CartVisitor {
    type Value = Cart;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping line keys to cart lines")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Cart, A::Error> {
        let mut cart = Cart::new();

        while let Some((key, mut line)) = access.next_entry::<String, CartLine>()? {
            // Lookups go through the object key, so it wins over the field.
            line.key = key;
            cart.upsert(line);
        }

        Ok(cart)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UNIT_VARIANT;

    fn sandwich() -> ProductSnapshot {
        ProductSnapshot {
            id: 1,
            name: "Milanesa".to_string(),
            image: Some("img/milanesa.webp".to_string()),
        }
    }

    fn beverage() -> ProductSnapshot {
        ProductSnapshot {
            id: 9,
            name: "Coca-Cola 500ml".to_string(),
            image: None,
        }
    }

    fn arabe() -> Variant {
        Variant::new("Pan Árabe", Money::from_units(500))
    }

    fn frances() -> Variant {
        Variant::new("Pan Francés", Money::from_units(450))
    }

    #[test]
    fn test_normalize_variant() {
        assert_eq!(normalize_variant("Pan Árabe"), "pan-árabe");
        assert_eq!(normalize_variant("PAN \t\n ÁRABE"), "pan-árabe");
        assert_eq!(normalize_variant(" Doble "), "-doble-");
        assert_eq!(normalize_variant("Unidad"), "unidad");
    }

    #[test]
    fn test_line_key_is_pure() {
        assert_eq!(line_key(1, "Pan Árabe"), line_key(1, "pan   árabe"));
        assert_ne!(line_key(1, "Pan Árabe"), line_key(2, "Pan Árabe"));
    }

    #[test]
    fn test_add_same_pair_merges() {
        let mut cart = Cart::new();
        let first = cart.add(&sandwich(), &arabe());
        let second = cart.add(&sandwich(), &arabe());

        assert_eq!(first, second);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[0].key, "1-pan-árabe");
    }

    #[test]
    fn test_add_other_variant_creates_line() {
        let mut cart = Cart::new();
        cart.add(&sandwich(), &arabe());
        cart.add(&sandwich(), &frances());

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total().units(), 950);
    }

    #[test]
    fn test_add_keeps_condiment_count() {
        let mut cart = Cart::new();
        let key = cart.add(&sandwich(), &arabe());
        cart.add(&sandwich(), &arabe());
        cart.set_condiment_qty(&key, 2);
        cart.add(&sandwich(), &arabe());

        let line = cart.line(&key).unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.condiment_qty, 2);
    }

    #[test]
    fn test_add_freezes_snapshot() {
        let mut cart = Cart::new();
        let key = cart.add(&sandwich(), &arabe());

        let repriced = Variant::new("Pan Árabe", Money::from_units(900));
        cart.add(&sandwich(), &repriced);

        let line = cart.line(&key).unwrap();
        assert_eq!(line.price.units(), 500);
        assert_eq!(line.product_image.as_deref(), Some("img/milanesa.webp"));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        let key = cart.add(&sandwich(), &arabe());

        assert_eq!(cart.update_quantity(&key, 7), QuantityUpdate::Updated);
        assert_eq!(cart.line(&key).unwrap().quantity, 7);

        assert_eq!(cart.update_quantity("nope", 3), QuantityUpdate::Missing);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = Cart::new();
        let key = cart.add(&sandwich(), &arabe());
        assert_eq!(cart.update_quantity(&key, 0), QuantityUpdate::Removed);
        assert!(cart.is_empty());

        let key = cart.add(&sandwich(), &arabe());
        assert_eq!(cart.update_quantity(&key, -4), QuantityUpdate::Removed);
        assert!(cart.line(&key).is_none());
    }

    #[test]
    fn test_update_quantity_does_not_reclamp_condiments() {
        let mut cart = Cart::new();
        let key = cart.add(&sandwich(), &arabe());
        cart.update_quantity(&key, 3);
        cart.set_condiment_qty(&key, 3);
        cart.update_quantity(&key, 1);

        let line = cart.line(&key).unwrap();
        assert_eq!(line.condiment_qty, 3);
        assert!(line.condiments_exceed_quantity());
    }

    #[test]
    fn test_set_condiment_qty_clamps() {
        let mut cart = Cart::new();
        let key = cart.add(&sandwich(), &arabe());
        cart.add(&sandwich(), &arabe());

        for (requested, stored) in [(-3, 0), (0, 0), (1, 1), (2, 2), (5, 2), (i64::MAX, 2)] {
            assert_eq!(cart.set_condiment_qty(&key, requested), Some(stored));
        }

        assert_eq!(cart.set_condiment_qty("missing", 1), None);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        let key = cart.add(&sandwich(), &arabe());

        assert!(cart.remove("missing").is_none());
        let removed = cart.remove(&key).unwrap();
        assert_eq!(removed.product_name, "Milanesa");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_scenario() {
        let mut cart = Cart::new();
        cart.add(&sandwich(), &arabe());
        assert_eq!(cart.total().units(), 500);

        cart.add(&sandwich(), &arabe());
        assert_eq!(cart.total().units(), 1000);

        cart.add(&beverage(), &Variant::unit(Money::from_units(300)));
        let totals = cart.totals();
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_items, 3);
        assert_eq!(totals.total.units(), 1300);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(&beverage(), &Variant::unit(Money::from_units(300)));
        cart.add(&sandwich(), &frances());
        cart.add(&sandwich(), &arabe());
        cart.add(&beverage(), &Variant::unit(Money::from_units(300)));

        let keys: Vec<&str> = cart.items().iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, vec!["9-unidad", "1-pan-francés", "1-pan-árabe"]);
    }

    #[test]
    fn test_serializes_as_keyed_object_in_order() {
        let mut cart = Cart::new();
        cart.add(&sandwich(), &frances());
        cart.add(&beverage(), &Variant::unit(Money::from_units(300)));

        let json = serde_json::to_string(&cart).unwrap();
        let frances_at = json.find("\"1-pan-francés\":").unwrap();
        let unidad_at = json.find("\"9-unidad\":").unwrap();
        assert!(frances_at < unidad_at);

        let parsed: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cart);
    }

    #[test]
    fn test_deserialize_object_key_wins() {
        let json = format!(
            r#"{{"9-unidad": {{
                "key": "stale",
                "productId": 9,
                "productName": "Agua",
                "variantType": "{}",
                "price": 300,
                "quantity": 2
            }}}}"#,
            UNIT_VARIANT
        );

        let cart: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(cart.items()[0].key, "9-unidad");
        assert!(cart.line("9-unidad").is_some());
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let mut cart = Cart::new();
        let key = cart.add(&sandwich(), &arabe());
        cart.add(&beverage(), &Variant::unit(Money::from_units(1300)));

        assert_eq!(
            cart.update_quantity(&key, 20_000_000_000_000_000),
            QuantityUpdate::Updated
        );
        assert_eq!(cart.total(), Money::from_units(i64::MAX));

        cart.update_quantity(&key, i64::MAX);
        assert_eq!(cart.add(&sandwich(), &arabe()), key);
        assert_eq!(cart.line(&key).unwrap().quantity, i64::MAX);
        assert_eq!(cart.total_items(), i64::MAX);
        assert_eq!(cart.totals().total, Money::from_units(i64::MAX));
    }
}

//! # Domain Types
//!
//! Core domain types shared by the catalog, the cart and the order export.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Beverage     │   │    CartLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  key            │       │
//! │  │  name, image    │   │  name, image    │   │  product snap.  │       │
//! │  │  variants[]     │   │  price          │   │  variant, price │       │
//! │  └────────┬────────┘   └────────┬────────┘   │  quantity       │       │
//! │           │                     │            │  condiment_qty  │       │
//! │           ▼                     ▼            └─────────────────┘       │
//! │  ┌─────────────────────────────────────┐                               │
//! │  │  ProductSnapshot + Variant          │ ──► Cart::add                 │
//! │  │  (what the cart freezes at add-time)│                               │
//! │  └─────────────────────────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A cart line copies the product name, image and price when it is created.
//! Later catalog edits never reach lines that are already in the cart.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Catalog identifier of a product or beverage.
pub type ProductId = u32;

/// Variant label used for items that have no variants (beverages).
pub const UNIT_VARIANT: &str = "Unidad";

// =============================================================================
// Variant
// =============================================================================

/// A selectable configuration of a product (bread type, size) with its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Variant {
    /// Display label, e.g. "Pan Árabe". Serialized as `type`.
    #[serde(rename = "type")]
    pub variant_type: String,

    /// Unit price for this variant.
    pub price: Money,
}

impl Variant {
    /// Creates a variant from a label and a price.
    pub fn new(variant_type: impl Into<String>, price: Money) -> Self {
        Variant {
            variant_type: variant_type.into(),
            price,
        }
    }

    /// The implicit variant of a variant-less item.
    pub fn unit(price: Money) -> Self {
        Variant::new(UNIT_VARIANT, price)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A menu product with one or more variants (sandwiches, burgers, focaccias).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Image URL shown on the menu card and in the cart.
    #[serde(default)]
    pub image: Option<String>,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Returns the variant at `index`, if any.
    pub fn variant(&self, index: usize) -> Option<&Variant> {
        self.variants.get(index)
    }

    /// Freezes the fields a cart line keeps.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

// =============================================================================
// Beverage
// =============================================================================

/// A variant-less menu item with a single price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Beverage {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub price: Money,
}

impl Beverage {
    /// Freezes the fields a cart line keeps.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }

    /// Beverages are always ordered as the unit variant.
    pub fn unit_variant(&self) -> Variant {
        Variant::unit(self.price)
    }
}

// =============================================================================
// Product Snapshot
// =============================================================================

/// The product fields the cart captures at add-time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
}

// =============================================================================
// Cart Line
// =============================================================================

/// One grouped row in the cart, unique per (product, variant).
///
/// ## Persisted Shape
/// ```json
/// {
///   "key": "1-pan-árabe",
///   "productId": 1,
///   "productName": "Milanesa",
///   "productImage": "img/milanesa.webp",
///   "variantType": "Pan Árabe",
///   "price": 500,
///   "quantity": 2,
///   "condimentQty": 1
/// }
/// ```
/// Older snapshots call the condiment counter `salsaCriollaQty` or omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Composite of product id and normalized variant label. Inside a
    /// snapshot the object key takes precedence.
    #[serde(default)]
    pub key: String,

    pub product_id: ProductId,

    /// Product name at time of adding (frozen)
    pub product_name: String,

    /// Product image at time of adding (frozen)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image: Option<String>,

    pub variant_type: String,

    /// Unit price at time of adding (frozen)
    pub price: Money,

    /// Always >= 1 while the line exists.
    #[ts(type = "number")]
    pub quantity: i64,

    /// How many units of this line get criolla sauce.
    #[serde(rename = "condimentQty", alias = "salsaCriollaQty", default)]
    #[ts(type = "number")]
    pub condiment_qty: i64,
}

impl CartLine {
    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// True when a quantity decrease left more condiment units than items.
    ///
    /// Quantity updates do not re-clamp the condiment counter, so a renderer
    /// can use this to flag the line.
    pub fn condiments_exceed_quantity(&self) -> bool {
        self.condiment_qty > self.quantity
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for renderers (badge, sticky bar, footer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Number of distinct lines.
    #[ts(type = "number")]
    pub line_count: usize,
    /// Sum of quantities across lines.
    #[ts(type = "number")]
    pub total_items: i64,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i64, condiment_qty: i64) -> CartLine {
        CartLine {
            key: "1-pan-árabe".to_string(),
            product_id: 1,
            product_name: "Milanesa".to_string(),
            product_image: None,
            variant_type: "Pan Árabe".to_string(),
            price: Money::from_units(500),
            quantity,
            condiment_qty,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(3, 0).line_total().units(), 1500);
    }

    #[test]
    fn test_condiments_exceed_quantity() {
        assert!(!line(2, 2).condiments_exceed_quantity());
        assert!(line(1, 2).condiments_exceed_quantity());
    }

    #[test]
    fn test_beverage_unit_variant() {
        let beverage = Beverage {
            id: 9,
            name: "Coca-Cola 500ml".to_string(),
            image: None,
            price: Money::from_units(300),
        };

        let variant = beverage.unit_variant();
        assert_eq!(variant.variant_type, UNIT_VARIANT);
        assert_eq!(variant.price.units(), 300);
    }

    #[test]
    fn test_cart_line_json_field_names() {
        let json = serde_json::to_value(line(2, 1)).unwrap();
        assert_eq!(json["productId"], 1);
        assert_eq!(json["variantType"], "Pan Árabe");
        assert_eq!(json["condimentQty"], 1);
        assert!(json.get("productImage").is_none());
    }

    #[test]
    fn test_cart_line_accepts_old_condiment_field() {
        let json = r#"{
            "key": "1-pan-árabe",
            "productId": 1,
            "productName": "Milanesa",
            "variantType": "Pan Árabe",
            "price": 500,
            "quantity": 2,
            "salsaCriollaQty": 2
        }"#;

        let parsed: CartLine = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.condiment_qty, 2);
        assert_eq!(parsed.product_image, None);
    }

    #[test]
    fn test_cart_line_condiment_defaults_to_zero() {
        let json = r#"{
            "key": "9-unidad",
            "productId": 9,
            "productName": "Agua",
            "variantType": "Unidad",
            "price": 300,
            "quantity": 1
        }"#;

        let parsed: CartLine = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.condiment_qty, 0);
    }

    #[test]
    fn test_variant_serializes_type_field() {
        let json = serde_json::to_value(Variant::new("Pan Francés", Money::from_units(450))).unwrap();
        assert_eq!(json["type"], "Pan Francés");
        assert_eq!(json["price"], 450);
    }
}

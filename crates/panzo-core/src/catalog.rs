//! # Catalog
//!
//! The menu the page renders and the resolution of an "add to order" click
//! into the `(product, variant)` pair the cart accepts.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Click on variant pill ──► VariantSelection::select(id, index)          │
//! │                                                                         │
//! │  Click "Agregar al pedido" (data-product-id, data-product-type)         │
//! │       │                                                                 │
//! │       ├── ItemKind::Beverage ──► beverage(id)                           │
//! │       │                          variant = "Unidad" @ beverage price    │
//! │       │                                                                 │
//! │       └── ItemKind::Product ───► product(id)                            │
//! │                                  variant = variants[selected(id)]       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Some(ResolvedItem) ──► CartStore::add_to_cart                          │
//! │  None ──────────────► nothing is added                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Beverage, Product, ProductId, ProductSnapshot, Variant};
use crate::validation::{validate_price, validate_product_name, validate_variants};

/// Which list an add-to-order button points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Sandwiches, burgers, focaccias: anything with variants.
    #[default]
    Product,
    /// Variant-less drinks.
    Beverage,
}

impl std::str::FromStr for ItemKind {
    type Err = std::convert::Infallible;

    /// Parses the button's `data-product-type`; anything but a beverage is a
    /// product with variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bebida" | "beverage" => Ok(ItemKind::Beverage),
            _ => Ok(ItemKind::Product),
        }
    }
}

/// A catalog entry resolved into what the cart snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub product: ProductSnapshot,
    pub variant: Variant,
}

// =============================================================================
// Variant Selection
// =============================================================================

/// Remembers which variant pill is active for each product.
///
/// Products that were never touched use their first variant.
#[derive(Debug, Clone, Default)]
pub struct VariantSelection {
    selected: HashMap<ProductId, usize>,
}

impl VariantSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pill click.
    pub fn select(&mut self, product_id: ProductId, index: usize) {
        self.selected.insert(product_id, index);
    }

    /// The active variant index for a product (0 if never selected).
    pub fn selected(&self, product_id: ProductId) -> usize {
        self.selected.get(&product_id).copied().unwrap_or(0)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The menu: products with variants plus beverages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub beverages: Vec<Beverage>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, beverages: Vec<Beverage>) -> Self {
        Catalog {
            products,
            beverages,
        }
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn beverage(&self, id: ProductId) -> Option<&Beverage> {
        self.beverages.iter().find(|b| b.id == id)
    }

    /// Resolves a button click into a product snapshot and variant.
    ///
    /// ## Errors
    /// - [`CoreError::BeverageNotFound`] / [`CoreError::ProductNotFound`]
    /// - [`CoreError::VariantOutOfRange`] when the remembered index is stale
    pub fn try_resolve(
        &self,
        kind: ItemKind,
        id: ProductId,
        selection: &VariantSelection,
    ) -> CoreResult<ResolvedItem> {
        match kind {
            ItemKind::Beverage => {
                let beverage = self.beverage(id).ok_or(CoreError::BeverageNotFound(id))?;
                Ok(ResolvedItem {
                    product: beverage.snapshot(),
                    variant: beverage.unit_variant(),
                })
            }
            ItemKind::Product => {
                let product = self.product(id).ok_or(CoreError::ProductNotFound(id))?;
                let index = selection.selected(id);
                let variant = product
                    .variant(index)
                    .ok_or(CoreError::VariantOutOfRange {
                        product_id: id,
                        index,
                        available: product.variants.len(),
                    })?;
                Ok(ResolvedItem {
                    product: product.snapshot(),
                    variant: variant.clone(),
                })
            }
        }
    }

    /// Like [`Catalog::try_resolve`], for callers that only skip the add.
    pub fn resolve(
        &self,
        kind: ItemKind,
        id: ProductId,
        selection: &VariantSelection,
    ) -> Option<ResolvedItem> {
        self.try_resolve(kind, id, selection).ok()
    }

    /// Checks catalog data before it is served to the page.
    ///
    /// ## Rules
    /// - Names valid, prices non-negative
    /// - Every product has at least one variant, labels distinct
    /// - Ids unique within each list
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut product_ids = HashSet::new();
        for product in &self.products {
            validate_product_name(&product.name)?;
            validate_variants(&product.variants)?;
            if !product_ids.insert(product.id) {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: product.id.to_string(),
                });
            }
        }

        let mut beverage_ids = HashSet::new();
        for beverage in &self.beverages {
            validate_product_name(&beverage.name)?;
            validate_price(beverage.price)?;
            if !beverage_ids.insert(beverage.id) {
                return Err(ValidationError::Duplicate {
                    field: "beverage id".to_string(),
                    value: beverage.id.to_string(),
                });
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

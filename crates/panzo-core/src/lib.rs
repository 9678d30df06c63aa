//! # panzo-core: Pure Business Logic for the Panzo Cart
//!
//! Everything the ordering page decides about a cart, as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Panzo Ordering Page                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Page (menu cards, cart sidebar)              │   │
//! │  │    Variant pills ──► Add button ──► Cart sidebar ──► WhatsApp   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    panzo-store (CartStore)                      │   │
//! │  │    persist, expire, notify                                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ panzo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │  catalog  │  │   order   │  │   money   │  │   │
//! │  │   │ line keys │  │ variants  │  │ WhatsApp  │  │  pesos    │  │   │
//! │  │   │ merge/sum │  │ beverages │  │  message  │  │  display  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Variant, Beverage, CartLine)
//! - [`money`] - Integer money in whole pesos
//! - [`cart`] - The line mapping: keys, merge, quantities, condiments, totals
//! - [`catalog`] - Menu lookups and variant selection
//! - [`order`] - WhatsApp order message and link
//! - [`error`] - Domain error types
//! - [`validation`] - Catalog and settings validation
//!
//! ## Example Usage
//!
//! ```rust
//! use panzo_core::{Cart, Money, ProductSnapshot, Variant};
//!
//! let milanesa = ProductSnapshot { id: 1, name: "Milanesa".into(), image: None };
//! let arabe = Variant::new("Pan Árabe", Money::from_units(500));
//!
//! let mut cart = Cart::new();
//! let key = cart.add(&milanesa, &arabe);
//! cart.add(&milanesa, &arabe);
//!
//! assert_eq!(key, "1-pan-árabe");
//! assert_eq!(cart.total_items(), 2);
//! assert_eq!(cart.total().to_string(), "$1.000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{line_key, Cart, QuantityUpdate};
pub use catalog::{Catalog, ItemKind, ResolvedItem, VariantSelection};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use order::OrderConfig;
pub use types::*;

//! # panzo-store: Cart Store, Persistence and Notification
//!
//! Owns the visitor's cart at runtime on top of the pure rules in
//! `panzo-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Panzo Ordering Page                              │
//! │                                                                         │
//! │   menu buttons      cart sidebar      badge / sticky bar    WhatsApp   │
//! │        │                 ▲                    ▲                 ▲       │
//! │        ▼                 │ subscribe          │                 │       │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ panzo-store (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   CartStore ── snapshot ── CartStorage (memory / file)          │   │
//! │  │       │                                                         │   │
//! │  │       ├── Clock (expiration)                                   │   │
//! │  │       └── listeners (SubscriptionId)                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                ▼                                        │
//! │                 panzo-core (Cart, Catalog, order export)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - `CartStore` and its subscription registry
//! - [`snapshot`] - Persisted JSON shape and legacy detection
//! - [`storage`] - Durable key-value backends
//! - [`clock`] - Time source for timestamps and expiry
//! - [`config`] - TOML + environment configuration
//! - [`state`] - Thread-safe shared handle
//! - [`error`] - Store error types
//!
//! ## Example Usage
//!
//! ```rust
//! use panzo_core::{Money, ProductSnapshot, Variant};
//! use panzo_store::{CartStore, MemoryStorage};
//!
//! let mut store = CartStore::new(MemoryStorage::new());
//! let coke = ProductSnapshot { id: 9, name: "Coca-Cola 500ml".into(), image: None };
//!
//! store.subscribe(|cart| println!("badge: {}", cart.total_items()));
//! let key = store.add_to_cart(&coke, &Variant::unit(Money::from_units(1300)));
//! store.update_quantity(&key, 3);
//!
//! assert_eq!(store.total().to_string(), "$3.900");
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{PanzoConfig, StoreConfig};
pub use error::{ConfigError, StorageError, StoreError};
pub use state::CartState;
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::{CartStore, LoadOutcome, SubscriptionId};

//! # Cart Store
//!
//! The single owner of the visitor's cart. Every mutation runs to completion
//! before returning: change the lines, write the snapshot, call listeners.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore Operations                                 │
//! │                                                                         │
//! │  Page Action             Store Operation           Persist + Notify     │
//! │  ───────────             ───────────────           ────────────────     │
//! │                                                                         │
//! │  Click "Agregar" ──────► add_to_cart() ──────────► always               │
//! │                                                                         │
//! │  +/- buttons ──────────► update_quantity() ──────► only if key exists   │
//! │                          (<= 0 removes the line)                       │
//! │                                                                         │
//! │  Trash icon ───────────► remove_from_cart() ─────► always               │
//! │                                                                         │
//! │  Criolla +/- ──────────► update_condiment_qty() ─► only if key exists   │
//! │                                                                         │
//! │  "Vaciar" ─────────────► clear_cart() ───────────► always               │
//! │                                                                         │
//! │  Render ───────────────► items() / totals() ─────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Load at Construction
//! ```text
//!   storage.get_item(key)
//!        │
//!        ├── None ──────────────────────────────► Empty
//!        ├── unreadable / malformed ──► warn! ──► Corrupted (empty cart)
//!        ├── no timestamp ──────────────────────► Legacy (adopted as-is)
//!        └── timestamp
//!              ├── now - saved_at > window ──► remove_item ──► Expired
//!              └── otherwise ───────────────────────────────► Restored
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use panzo_core::order::{self, OrderConfig};
use panzo_core::{
    Cart, CartLine, CartTotals, Catalog, ItemKind, Money, ProductId, ProductSnapshot,
    QuantityUpdate, ResolvedItem, ValidationError, Variant, VariantSelection,
};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::snapshot::{self, LoadedSnapshot};
use crate::storage::CartStorage;

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Listener called after every mutation with the current cart.
pub type Listener = Box<dyn FnMut(&Cart) + Send>;

/// What construction found in durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored under the key.
    Empty,
    /// A current-format snapshot inside the expiration window.
    Restored,
    /// A snapshot without timestamp, adopted without expiry check.
    Legacy,
    /// A snapshot older than the window; it was deleted.
    Expired,
    /// Unreadable or malformed; started empty.
    Corrupted,
}

/// The cart store.
///
/// ## Invariants
/// - Every line has quantity >= 1
/// - Lines keep first-insertion order
/// - Storage holds the state as of the last mutation (unless a write failed)
pub struct CartStore {
    cart: Cart,
    storage: Box<dyn CartStorage>,
    clock: Arc<dyn Clock>,
    storage_key: String,
    expiration: Duration,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    load_outcome: LoadOutcome,
    last_saved_at: Option<DateTime<Utc>>,
}

impl CartStore {
    /// Opens the store with the system clock and default settings.
    pub fn new(storage: impl CartStorage + 'static) -> Self {
        Self::open(storage, SystemClock, &StoreConfig::default())
    }

    /// Opens the store, restoring whatever valid snapshot `storage` holds.
    ///
    /// Never fails: a bad snapshot is logged and the cart starts empty.
    /// `config` is taken as given; [`PanzoConfig::load`](crate::PanzoConfig::load)
    /// validates it, and [`FileStorage`](crate::FileStorage) refuses keys
    /// that would leave its directory.
    pub fn open(
        storage: impl CartStorage + 'static,
        clock: impl Clock + 'static,
        config: &StoreConfig,
    ) -> Self {
        let mut store = CartStore {
            cart: Cart::new(),
            storage: Box::new(storage),
            clock: Arc::new(clock),
            storage_key: config.storage_key.clone(),
            expiration: config.expiration(),
            listeners: Vec::new(),
            next_subscription: 0,
            load_outcome: LoadOutcome::Empty,
            last_saved_at: None,
        };
        store.load();
        store
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `variant` of `product`.
    ///
    /// Always succeeds; returns the key of the line that was created or
    /// incremented.
    pub fn add_to_cart(&mut self, product: &ProductSnapshot, variant: &Variant) -> String {
        let key = self.cart.add(product, variant);
        debug!(
            key = %key,
            product_id = product.id,
            variant = %variant.variant_type,
            "Added to cart"
        );
        self.commit();
        key
    }

    /// Adds a catalog resolution result.
    pub fn add_resolved(&mut self, item: &ResolvedItem) -> String {
        self.add_to_cart(&item.product, &item.variant)
    }

    /// Resolves a menu button press and adds it.
    ///
    /// Returns `None`, without touching the cart, when the id is unknown or
    /// the selected variant index is out of range.
    pub fn add_from_catalog(
        &mut self,
        catalog: &Catalog,
        kind: ItemKind,
        id: ProductId,
        selection: &VariantSelection,
    ) -> Option<String> {
        match catalog.try_resolve(kind, id, selection) {
            Ok(item) => Some(self.add_resolved(&item)),
            Err(e) => {
                warn!(error = %e, ?kind, id, "Add to cart ignored");
                None
            }
        }
    }

    /// Sets a line's quantity. `<= 0` removes the line; an unknown key is a
    /// no-op that neither persists nor notifies.
    ///
    /// The condiment count is left as it is, even above the new quantity.
    pub fn update_quantity(&mut self, key: &str, quantity: i64) {
        match self.cart.update_quantity(key, quantity) {
            QuantityUpdate::Missing => {
                debug!(key, "Quantity update for unknown line ignored");
            }
            QuantityUpdate::Removed => {
                debug!(key, quantity, "Line removed by quantity update");
                self.commit();
            }
            QuantityUpdate::Updated => {
                debug!(key, quantity, "Line quantity updated");
                self.commit();
            }
        }
    }

    /// Deletes a line. Persists and notifies even when the key is unknown.
    pub fn remove_from_cart(&mut self, key: &str) {
        let removed = self.cart.remove(key).is_some();
        debug!(key, removed, "Remove from cart");
        self.commit();
    }

    /// Sets how many units of a line get criolla sauce, clamped to
    /// `[0, quantity]`. Unknown keys are ignored.
    pub fn update_condiment_qty(&mut self, key: &str, condiment_qty: i64) {
        match self.cart.set_condiment_qty(key, condiment_qty) {
            Some(stored) => {
                debug!(key, requested = condiment_qty, stored, "Condiment count updated");
                self.commit();
            }
            None => debug!(key, "Condiment update for unknown line ignored"),
        }
    }

    /// Empties the cart.
    pub fn clear_cart(&mut self) {
        debug!(lines = self.cart.len(), "Clearing cart");
        self.cart.clear();
        self.commit();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLine] {
        self.cart.items()
    }

    pub fn line(&self, key: &str) -> Option<&CartLine> {
        self.cart.line(key)
    }

    /// Sum of `price × quantity`.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> i64 {
        self.cart.total_items()
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    /// Time of the last successful write, if any happened since opening.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// The WhatsApp order text, `None` for an empty cart.
    pub fn order_message(&self, config: &OrderConfig) -> Option<String> {
        order::compose_message(self.cart.items(), config)
    }

    /// The `wa.me` link for the current cart, `None` for an empty cart.
    pub fn whatsapp_url(&self, config: &OrderConfig) -> Result<Option<Url>, ValidationError> {
        order::whatsapp_url(self.cart.items(), config)
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Registers a listener, called synchronously after every mutation in
    /// registration order.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Cart) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!(?id, listeners = self.listeners.len(), "Listener subscribed");
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        let removed = self.listeners.len() != before;
        debug!(?id, removed, "Listener unsubscribed");
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn commit(&mut self) {
        self.persist();
        self.notify();
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.cart);
        }
    }

    /// Writes the snapshot. Failures are logged; the in-memory cart stays
    /// authoritative.
    fn persist(&mut self) {
        let now = self.clock.now();

        let written = snapshot::encode(&self.cart, now).and_then(|raw| {
            self.storage
                .set_item(&self.storage_key, &raw)
                .map_err(StoreError::from)
        });

        match written {
            Ok(()) => {
                self.last_saved_at = Some(now);
                debug!(key = %self.storage_key, lines = self.cart.len(), "Cart saved");
            }
            Err(e) => {
                error!(key = %self.storage_key, error = %e, "Failed to save cart");
            }
        }
    }

    fn load(&mut self) {
        let (cart, outcome) = match self.read_snapshot() {
            Ok(None) => (Cart::new(), LoadOutcome::Empty),
            Ok(Some(LoadedSnapshot::Legacy(cart))) => (cart, LoadOutcome::Legacy),
            Ok(Some(LoadedSnapshot::Current { cart, saved_at })) => {
                let age = self.clock.now() - saved_at;
                if age > self.expiration {
                    info!(
                        key = %self.storage_key,
                        age_minutes = age.num_minutes(),
                        "Stored cart expired, discarding"
                    );
                    if let Err(e) = self.storage.remove_item(&self.storage_key) {
                        error!(key = %self.storage_key, error = %e, "Failed to remove expired cart");
                    }
                    (Cart::new(), LoadOutcome::Expired)
                } else {
                    (cart, LoadOutcome::Restored)
                }
            }
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "Stored cart unreadable, starting empty");
                (Cart::new(), LoadOutcome::Corrupted)
            }
        };

        info!(
            key = %self.storage_key,
            ?outcome,
            lines = cart.len(),
            "Cart loaded"
        );
        self.cart = cart;
        self.load_outcome = outcome;
    }

    fn read_snapshot(&self) -> Result<Option<LoadedSnapshot>, StoreError> {
        match self.storage.get_item(&self.storage_key)? {
            Some(raw) => snapshot::decode(&raw).map(Some),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("storage_key", &self.storage_key)
            .field("expiration", &self.expiration)
            .field("listeners", &self.listeners.len())
            .field("load_outcome", &self.load_outcome)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

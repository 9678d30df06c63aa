//! # Shared Cart State
//!
//! For hosts that dispatch page events from more than one thread.
//!
//! ## Thread Safety
//! The store is wrapped in `Arc<Mutex<T>>`:
//! 1. Several handlers may touch the cart
//! 2. A mutation (change, save, notify) must not interleave with another
//!
//! Listeners run while the lock is held, so a listener must not call back
//! into the same `CartState`.

use std::sync::{Arc, Mutex, PoisonError};

use crate::store::CartStore;

/// Cloneable handle to one [`CartStore`].
#[derive(Debug, Clone)]
pub struct CartState {
    store: Arc<Mutex<CartStore>>,
}

impl CartState {
    pub fn new(store: CartStore) -> Self {
        CartState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_store(|store| store.totals());
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartStore) -> R,
    {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    /// Executes a function with write access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_store_mut(|store| store.add_to_cart(&product, &variant));
    /// ```
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartStore) -> R,
    {
        // A listener that panicked mid-notify leaves the cart itself intact.
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }
}

impl From<CartStore> for CartState {
    fn from(store: CartStore) -> Self {
        CartState::new(store)
    }
}

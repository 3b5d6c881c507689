//! Application state shared across handlers.

use std::sync::Arc;

use crate::services::{CartService, CheckoutService};
use crate::stores::Stores;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// stores and the domain services built over them.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    stores: Stores,
    cart: CartService,
    checkout: CheckoutService,
}

impl AppState {
    /// Create a new application state over a set of stores.
    #[must_use]
    pub fn new(stores: Stores) -> Self {
        let cart = CartService::new(&stores);
        let checkout = CheckoutService::new(&stores);

        Self {
            inner: Arc::new(AppStateInner {
                stores,
                cart,
                checkout,
            }),
        }
    }

    /// Get the store handles.
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get the cart aggregate service.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    /// Get the checkout workflow service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}

//! The checkout workflow: ownership-validated cart → order conversion.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use colophon_core::{CartId, UserId};

use crate::models::{NewOrder, Order};
use crate::services::CartService;
use crate::stores::{CartStore, OrderStore, StoreError, Stores, UserStore};

/// Error from the checkout workflow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The confirming user does not exist.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// The cart does not exist, or belongs to a different user. The two
    /// cases are deliberately indistinguishable to the caller.
    #[error("cart {cart_id} not found for user {user_id}")]
    CartNotFound { cart_id: CartId, user_id: UserId },

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Converts a user's cart into an order.
#[derive(Clone)]
pub struct CheckoutService {
    users: Arc<dyn UserStore>,
    carts: Arc<dyn CartStore>,
    orders: Arc<dyn OrderStore>,
    cart_service: CartService,
}

impl CheckoutService {
    #[must_use]
    pub fn new(stores: &Stores) -> Self {
        Self {
            users: stores.users.clone(),
            carts: stores.carts.clone(),
            orders: stores.orders.clone(),
            cart_service: CartService::new(stores),
        }
    }

    /// Confirm a cart and convert it into an order.
    ///
    /// The total is computed fresh from current catalog prices at
    /// confirmation time, the order snapshots the cart's book quantities by
    /// value, and the cart is deleted in the same atomic store operation
    /// that persists the order. The conversion is destructive: on success
    /// the cart no longer exists.
    ///
    /// # Errors
    ///
    /// `UserNotFound` if the user is absent; `CartNotFound` if the cart is
    /// absent *or* owned by someone else (no order is created and the cart
    /// is untouched in either case).
    pub async fn confirm_and_convert(
        &self,
        user_id: UserId,
        cart_id: CartId,
    ) -> Result<Order, CheckoutError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CheckoutError::UserNotFound(user_id))?;

        let cart = self
            .carts
            .find_by_id(cart_id)
            .await?
            .filter(|cart| cart.user_id == user.id)
            .ok_or(CheckoutError::CartNotFound { cart_id, user_id })?;

        let total = self.cart_service.total_for(&cart).await?;

        let order = NewOrder {
            user_id: cart.user_id,
            books: cart.books.clone(),
            total,
            order_date: Utc::now(),
        };

        let order = self.orders.create_from_cart(order, cart.id).await?;

        tracing::info!(
            user_id = %user_id,
            cart_id = %cart_id,
            order_id = %order.id,
            total = %order.total,
            "cart converted to order"
        );

        Ok(order)
    }
}

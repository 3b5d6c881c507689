//! Cart aggregate operations.
//!
//! Prices are always computed live from the book store at read time, never
//! cached on the cart: a price change after a book was added is reflected in
//! the total until checkout freezes it into an order.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use colophon_core::{BookId, CartId, UserId};

use crate::models::{Cart, NewCart};
use crate::stores::{BookStore, CartStore, StoreError, Stores, UserStore};

/// Error from a cart operation.
#[derive(Debug, Error)]
pub enum CartError {
    /// A non-positive quantity was supplied.
    #[error("quantity must be greater than zero, got {0}")]
    InvalidQuantity(i32),

    /// The cart does not exist.
    #[error("cart {0} not found")]
    CartNotFound(CartId),

    /// The book does not exist in the catalog.
    #[error("book {0} not found")]
    BookNotFound(BookId),

    /// The owning user does not exist.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// The book has no entry in the cart.
    #[error("book {0} is not in the cart")]
    BookNotInCart(BookId),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Operations on the cart aggregate.
#[derive(Clone)]
pub struct CartService {
    books: Arc<dyn BookStore>,
    users: Arc<dyn UserStore>,
    carts: Arc<dyn CartStore>,
}

impl CartService {
    #[must_use]
    pub fn new(stores: &Stores) -> Self {
        Self {
            books: stores.books.clone(),
            users: stores.users.clone(),
            carts: stores.carts.clone(),
        }
    }

    /// Create a cart for an existing user, empty or with initial contents.
    ///
    /// # Errors
    ///
    /// `UserNotFound` if the owning user does not exist.
    pub async fn create_cart(&self, new_cart: NewCart) -> Result<Cart, CartError> {
        if self.users.find_by_id(new_cart.user_id).await?.is_none() {
            return Err(CartError::UserNotFound(new_cart.user_id));
        }

        Ok(self.carts.create(new_cart).await?)
    }

    /// Add `quantity` copies of a book to a cart.
    ///
    /// An existing entry accumulates; a new entry is inserted. Returns the
    /// updated cart.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` for `quantity <= 0` (checked before any lookup),
    /// `CartNotFound` / `BookNotFound` for missing entities.
    pub async fn add_book(
        &self,
        cart_id: CartId,
        book_id: BookId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let mut cart = self
            .carts
            .find_by_id(cart_id)
            .await?
            .ok_or(CartError::CartNotFound(cart_id))?;

        if !self.books.exists(book_id).await? {
            return Err(CartError::BookNotFound(book_id));
        }

        *cart.books.entry(book_id).or_insert(0) += quantity;
        self.carts.save(&cart).await?;

        Ok(cart)
    }

    /// Remove a book's entry from a cart entirely.
    ///
    /// There is no partial-quantity decrement; removal is wholesale.
    ///
    /// # Errors
    ///
    /// `CartNotFound` if the cart is absent, `BookNotInCart` if the book has
    /// no entry in it.
    pub async fn remove_book(&self, cart_id: CartId, book_id: BookId) -> Result<Cart, CartError> {
        let mut cart = self
            .carts
            .find_by_id(cart_id)
            .await?
            .ok_or(CartError::CartNotFound(cart_id))?;

        if cart.books.remove(&book_id).is_none() {
            return Err(CartError::BookNotInCart(book_id));
        }

        self.carts.save(&cart).await?;

        Ok(cart)
    }

    /// The books mapping of a cart - empty for an empty cart, never null.
    ///
    /// # Errors
    ///
    /// `CartNotFound` if the cart is absent.
    pub async fn view_books(&self, cart_id: CartId) -> Result<BTreeMap<BookId, i32>, CartError> {
        let cart = self
            .carts
            .find_by_id(cart_id)
            .await?
            .ok_or(CartError::CartNotFound(cart_id))?;

        Ok(cart.books)
    }

    /// The live total price of a cart.
    ///
    /// # Errors
    ///
    /// `CartNotFound` if the cart is absent.
    pub async fn total_price(&self, cart_id: CartId) -> Result<Decimal, CartError> {
        let cart = self
            .carts
            .find_by_id(cart_id)
            .await?
            .ok_or(CartError::CartNotFound(cart_id))?;

        Ok(self.total_for(&cart).await?)
    }

    /// Sum `price * quantity` over the cart at current catalog prices.
    ///
    /// A book deleted from the catalog after it was added contributes zero
    /// rather than failing the whole computation.
    ///
    /// # Errors
    ///
    /// Propagates storage failures from the price lookups.
    pub async fn total_for(&self, cart: &Cart) -> Result<Decimal, StoreError> {
        let mut total = Decimal::ZERO;
        for (book_id, quantity) in &cart.books {
            if let Some(book) = self.books.find_by_id(*book_id).await? {
                total += book.price.times(*quantity);
            }
        }
        Ok(total)
    }

    /// Delete a cart.
    ///
    /// # Errors
    ///
    /// `CartNotFound` if the cart is absent.
    pub async fn delete_cart(&self, cart_id: CartId) -> Result<(), CartError> {
        if self.carts.delete_by_id(cart_id).await? {
            Ok(())
        } else {
            Err(CartError::CartNotFound(cart_id))
        }
    }
}

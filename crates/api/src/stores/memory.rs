//! In-memory store implementation for testing.
//!
//! A single [`MemoryStore`] implements every store trait over one shared
//! piece of state, providing the same interface as the `PostgreSQL`
//! implementation. Holding all aggregates behind one lock also gives
//! [`OrderStore::create_from_cart`] the same atomicity the Postgres backend
//! gets from a transaction.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use colophon_core::{BookId, CartId, OrderId, UserId};

use super::{BookStore, CartStore, OrderStore, StoreError, StoreResult, UserStore};
use crate::models::{Book, BookPatch, Cart, NewBook, NewCart, NewOrder, NewUser, Order, User};

#[derive(Default)]
struct Inner {
    books: BTreeMap<BookId, Book>,
    users: BTreeMap<UserId, User>,
    carts: BTreeMap<CartId, Cart>,
    orders: BTreeMap<OrderId, Order>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory backend for all four store traits.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_by_id(&self, id: BookId) -> StoreResult<Option<Book>> {
        Ok(self.state.read().await.books.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.state.read().await.books.values().cloned().collect())
    }

    async fn create(&self, book: NewBook) -> StoreResult<Book> {
        let mut state = self.state.write().await;
        let id = BookId::new(state.next_id());
        let book = Book {
            id,
            title: book.title,
            author: book.author,
            price: book.price,
            created_at: Utc::now(),
        };
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update_fields(&self, id: BookId, patch: BookPatch) -> StoreResult<Option<Book>> {
        let mut state = self.state.write().await;
        let Some(book) = state.books.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            book.title = title;
        }
        if let Some(author) = patch.author {
            book.author = author;
        }
        if let Some(price) = patch.price {
            book.price = price;
        }

        Ok(Some(book.clone()))
    }

    async fn delete_by_id(&self, id: BookId) -> StoreResult<bool> {
        Ok(self.state.write().await.books.remove(&id).is_some())
    }

    async fn exists(&self, id: BookId) -> StoreResult<bool> {
        Ok(self.state.read().await.books.contains_key(&id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        let id = UserId::new(state.next_id());
        let user = User {
            id,
            username: user.username,
            credential: user.credential,
            created_at: Utc::now(),
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: UserId) -> StoreResult<bool> {
        Ok(self.state.write().await.users.remove(&id).is_some())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn find_by_id(&self, id: CartId) -> StoreResult<Option<Cart>> {
        Ok(self.state.read().await.carts.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Cart>> {
        Ok(self.state.read().await.carts.values().cloned().collect())
    }

    async fn create(&self, cart: NewCart) -> StoreResult<Cart> {
        let mut state = self.state.write().await;
        let id = CartId::new(state.next_id());
        let cart = Cart {
            id,
            user_id: cart.user_id,
            books: cart.books,
            created_at: Utc::now(),
        };
        state.carts.insert(id, cart.clone());
        Ok(cart)
    }

    async fn save(&self, cart: &Cart) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if let Some(stored) = state.carts.get_mut(&cart.id) {
            stored.books = cart.books.clone();
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: CartId) -> StoreResult<bool> {
        Ok(self.state.write().await.carts.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn find_by_id(&self, id: OrderId) -> StoreResult<Option<Order>> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Order>> {
        Ok(self.state.read().await.orders.values().cloned().collect())
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Order>> {
        Ok(self
            .state
            .read()
            .await
            .orders
            .values()
            .filter(|order| order.order_date >= start && order.order_date <= end)
            .cloned()
            .collect())
    }

    async fn create_from_cart(&self, order: NewOrder, cart_id: CartId) -> StoreResult<Order> {
        let mut state = self.state.write().await;

        if state.carts.remove(&cart_id).is_none() {
            return Err(StoreError::Conflict(format!(
                "cart {cart_id} was deleted during checkout"
            )));
        }

        let id = OrderId::new(state.next_id());
        let order = order.into_order(id);
        state.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn delete_by_id(&self, id: OrderId) -> StoreResult<bool> {
        Ok(self.state.write().await.orders.remove(&id).is_some())
    }
}

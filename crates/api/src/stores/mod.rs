//! Persistence interfaces for the bookstore aggregates.
//!
//! Each aggregate gets its own narrow capability trait rather than a generic
//! repository abstraction: callers depend only on the operations they use,
//! and backends are swappable (PostgreSQL in production, in-memory in tests).
//!
//! Missing rows are reported as `Ok(None)` / `Ok(false)`, never as errors -
//! deciding that an absence is a failure is the job of the service layer.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use colophon_core::{BookId, CartId, OrderId, UserId};

use crate::models::{Book, BookPatch, Cart, NewBook, NewCart, NewOrder, NewUser, Order, User};

/// Error from a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The operation lost a race with a concurrent mutation.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for the book catalog.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_id(&self, id: BookId) -> StoreResult<Option<Book>>;

    async fn find_all(&self) -> StoreResult<Vec<Book>>;

    async fn create(&self, book: NewBook) -> StoreResult<Book>;

    /// Apply an allow-listed field patch. Returns `None` if the book does
    /// not exist.
    async fn update_fields(&self, id: BookId, patch: BookPatch) -> StoreResult<Option<Book>>;

    /// Returns `true` if a book was deleted.
    async fn delete_by_id(&self, id: BookId) -> StoreResult<bool>;

    async fn exists(&self, id: BookId) -> StoreResult<bool>;
}

/// Persistence for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn find_all(&self) -> StoreResult<Vec<User>>;

    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// Returns `true` if a user was deleted.
    async fn delete_by_id(&self, id: UserId) -> StoreResult<bool>;
}

/// Persistence for shopping carts.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_by_id(&self, id: CartId) -> StoreResult<Option<Cart>>;

    async fn find_all(&self) -> StoreResult<Vec<Cart>>;

    async fn create(&self, cart: NewCart) -> StoreResult<Cart>;

    /// Persist the cart's current books mapping (read-modify-write).
    async fn save(&self, cart: &Cart) -> StoreResult<()>;

    /// Returns `true` if a cart was deleted.
    async fn delete_by_id(&self, id: CartId) -> StoreResult<bool>;
}

/// Persistence for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_by_id(&self, id: OrderId) -> StoreResult<Option<Order>>;

    async fn find_all(&self) -> StoreResult<Vec<Order>>;

    /// Orders whose `order_date` falls within `[start, end]` inclusive.
    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Order>>;

    /// Persist `order` and delete the cart it was converted from, as one
    /// atomic unit. Fails with [`StoreError::Conflict`] (persisting nothing)
    /// if the cart vanished since it was read.
    async fn create_from_cart(&self, order: NewOrder, cart_id: CartId) -> StoreResult<Order>;

    /// Returns `true` if an order was deleted.
    async fn delete_by_id(&self, id: OrderId) -> StoreResult<bool>;
}

/// The full set of store handles the application runs against.
#[derive(Clone)]
pub struct Stores {
    pub books: Arc<dyn BookStore>,
    pub users: Arc<dyn UserStore>,
    pub carts: Arc<dyn CartStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl Stores {
    /// Stores backed by a shared `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            books: Arc::new(postgres::PgBookStore::new(pool.clone())),
            users: Arc::new(postgres::PgUserStore::new(pool.clone())),
            carts: Arc::new(postgres::PgCartStore::new(pool.clone())),
            orders: Arc::new(postgres::PgOrderStore::new(pool)),
        }
    }

    /// Stores backed by a single shared in-memory state, for tests.
    #[must_use]
    pub fn memory() -> Self {
        let store = Arc::new(memory::MemoryStore::new());
        Self {
            books: store.clone(),
            users: store.clone(),
            carts: store.clone(),
            orders: store,
        }
    }
}

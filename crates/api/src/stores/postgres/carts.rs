//! Cart store backed by the `carts` and `cart_books` tables.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use colophon_core::{BookId, CartId, UserId};

use super::super::{CartStore, StoreResult};
use crate::models::{Cart, NewCart};

/// `PostgreSQL`-backed [`CartStore`].
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct CartBookRow {
    cart_id: i64,
    book_id: i64,
    quantity: i32,
}

impl CartRow {
    fn into_cart(self, books: BTreeMap<BookId, i32>) -> Cart {
        Cart {
            id: CartId::new(self.id),
            user_id: UserId::new(self.user_id),
            books,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn find_by_id(&self, id: CartId) -> StoreResult<Option<Cart>> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, user_id, created_at FROM carts WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let entries = sqlx::query_as::<_, CartBookRow>(
            "SELECT cart_id, book_id, quantity FROM cart_books WHERE cart_id = $1",
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let books = entries
            .into_iter()
            .map(|e| (BookId::new(e.book_id), e.quantity))
            .collect();

        Ok(Some(row.into_cart(books)))
    }

    async fn find_all(&self) -> StoreResult<Vec<Cart>> {
        let rows = sqlx::query_as::<_, CartRow>(
            "SELECT id, user_id, created_at FROM carts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let entries = sqlx::query_as::<_, CartBookRow>(
            "SELECT cart_id, book_id, quantity FROM cart_books",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_cart: HashMap<i64, BTreeMap<BookId, i32>> = HashMap::new();
        for entry in entries {
            by_cart
                .entry(entry.cart_id)
                .or_default()
                .insert(BookId::new(entry.book_id), entry.quantity);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let books = by_cart.remove(&row.id).unwrap_or_default();
                row.into_cart(books)
            })
            .collect())
    }

    async fn create(&self, cart: NewCart) -> StoreResult<Cart> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            RETURNING id, user_id, created_at
            ",
        )
        .bind(cart.user_id.as_i64())
        .fetch_one(&mut *tx)
        .await?;

        for (book_id, quantity) in &cart.books {
            sqlx::query(
                "INSERT INTO cart_books (cart_id, book_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(row.id)
            .bind(book_id.as_i64())
            .bind(*quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.into_cart(cart.books))
    }

    async fn save(&self, cart: &Cart) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_books WHERE cart_id = $1")
            .bind(cart.id.as_i64())
            .execute(&mut *tx)
            .await?;

        for (book_id, quantity) in &cart.books {
            sqlx::query(
                "INSERT INTO cart_books (cart_id, book_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(cart.id.as_i64())
            .bind(book_id.as_i64())
            .bind(*quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete_by_id(&self, id: CartId) -> StoreResult<bool> {
        // cart_books rows go with the cart via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! Order store backed by the `orders` and `order_books` tables.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use colophon_core::{BookId, CartId, OrderId, UserId};

use super::super::{OrderStore, StoreError, StoreResult};
use crate::models::{NewOrder, Order};

/// `PostgreSQL`-backed [`OrderStore`].
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_entries(&self, order_id: i64) -> StoreResult<BTreeMap<BookId, i32>> {
        let entries = sqlx::query_as::<_, OrderBookRow>(
            "SELECT order_id, book_id, quantity FROM order_books WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries
            .into_iter()
            .map(|e| (BookId::new(e.book_id), e.quantity))
            .collect())
    }

    async fn assemble(&self, rows: Vec<OrderRow>) -> StoreResult<Vec<Order>> {
        let entries = sqlx::query_as::<_, OrderBookRow>(
            "SELECT order_id, book_id, quantity FROM order_books",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<i64, BTreeMap<BookId, i32>> = HashMap::new();
        for entry in entries {
            by_order
                .entry(entry.order_id)
                .or_default()
                .insert(BookId::new(entry.book_id), entry.quantity);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let books = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(books)
            })
            .collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    total: Decimal,
    order_date: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderBookRow {
    order_id: i64,
    book_id: i64,
    quantity: i32,
}

impl OrderRow {
    fn into_order(self, books: BTreeMap<BookId, i32>) -> Order {
        Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            books,
            total: self.total,
            order_date: self.order_date,
        }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn find_by_id(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, total, order_date FROM orders WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let books = self.load_entries(row.id).await?;
        Ok(Some(row.into_order(books)))
    }

    async fn find_all(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, total, order_date FROM orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        self.assemble(rows).await
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, total, order_date
            FROM orders
            WHERE order_date BETWEEN $1 AND $2
            ORDER BY order_date
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        self.assemble(rows).await
    }

    async fn create_from_cart(&self, order: NewOrder, cart_id: CartId) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, total, order_date)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, total, order_date
            ",
        )
        .bind(order.user_id.as_i64())
        .bind(order.total)
        .bind(order.order_date)
        .fetch_one(&mut *tx)
        .await?;

        for (book_id, quantity) in &order.books {
            sqlx::query(
                "INSERT INTO order_books (order_id, book_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(row.id)
            .bind(book_id.as_i64())
            .bind(*quantity)
            .execute(&mut *tx)
            .await?;
        }

        let deleted = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(cart_id.as_i64())
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            // Dropping the transaction rolls the order insert back.
            return Err(StoreError::Conflict(format!(
                "cart {cart_id} was deleted during checkout"
            )));
        }

        tx.commit().await?;

        Ok(row.into_order(order.books))
    }

    async fn delete_by_id(&self, id: OrderId) -> StoreResult<bool> {
        // order_books rows go with the order via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

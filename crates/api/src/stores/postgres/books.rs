//! Book store backed by the `books` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use colophon_core::{BookId, Price};

use super::super::{BookStore, StoreError, StoreResult};
use crate::models::{Book, BookPatch, NewBook};

/// `PostgreSQL`-backed [`BookStore`].
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookRow> for Book {
    type Error = StoreError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            StoreError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(Self {
            id: BookId::new(row.id),
            title: row.title,
            author: row.author,
            price,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn find_by_id(&self, id: BookId) -> StoreResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, author, price, created_at FROM books WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Book::try_from).transpose()
    }

    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, author, price, created_at FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Book::try_from).collect()
    }

    async fn create(&self, book: NewBook) -> StoreResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            INSERT INTO books (title, author, price)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, price, created_at
            ",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price.amount())
        .fetch_one(&self.pool)
        .await?;

        Book::try_from(row)
    }

    async fn update_fields(&self, id: BookId, patch: BookPatch) -> StoreResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(
            r"
            UPDATE books
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                price = COALESCE($4, price)
            WHERE id = $1
            RETURNING id, title, author, price, created_at
            ",
        )
        .bind(id.as_i64())
        .bind(patch.title)
        .bind(patch.author)
        .bind(patch.price.map(|p| p.amount()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Book::try_from).transpose()
    }

    async fn delete_by_id(&self, id: BookId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: BookId) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

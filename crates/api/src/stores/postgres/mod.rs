//! `PostgreSQL` implementations of the store traits.
//!
//! # Database layout
//!
//! - `books` - catalog
//! - `users` - registered users
//! - `carts` / `cart_books` - carts and their book → quantity entries
//! - `orders` / `order_books` - orders and their snapshotted entries
//!
//! `cart_books.book_id` and `order_books.book_id` intentionally carry no
//! foreign key: deleting a book must not cascade into carts or orders, and
//! pricing treats a dangling reference as contributing zero.
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p colophon-cli -- migrate
//! ```

mod books;
mod carts;
mod orders;
mod users;

pub use books::PgBookStore;
pub use carts::PgCartStore;
pub use orders::PgOrderStore;
pub use users::PgUserStore;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

//! HTTP route handlers for the bookstore API.
//!
//! # Route Structure
//!
//! ```text
//! # Books
//! GET    /api/v1/books/all                 - List the catalog
//! GET    /api/v1/books/{id}                - Book detail
//! POST   /api/v1/books                     - Create a book
//! PATCH  /api/v1/books/{id}                - Allow-listed field patch
//! DELETE /api/v1/books/{id}                - Delete a book
//!
//! # Users
//! POST   /api/v1/users                     - Register a user
//! GET    /api/v1/users/all                 - List users
//! GET    /api/v1/users/{id}                - User detail
//! DELETE /api/v1/users/{id}                - Delete a user
//! POST   /api/v1/users/{user_id}/{cart_id}/confirm - Checkout a cart
//!
//! # Carts
//! GET    /api/v1/carts/all                 - List carts
//! GET    /api/v1/carts/{id}                - Cart detail
//! GET    /api/v1/carts/{id}/books          - Books mapping (never null)
//! GET    /api/v1/carts/{id}/total          - Live total price
//! POST   /api/v1/carts                     - Create a cart
//! POST   /api/v1/carts/{cart_id}/add/{book_id}?quantity=N - Add a book
//! DELETE /api/v1/carts/{cart_id}/add/{book_id}            - Remove a book
//! DELETE /api/v1/carts/{id}                - Delete a cart
//!
//! # Orders
//! GET    /api/v1/orders/all                - List orders
//! GET    /api/v1/orders/filter?date=YYYY-MM-DD - Orders for a UTC day
//! GET    /api/v1/orders/{id}               - Order detail
//! GET    /api/v1/orders/{id}/total         - Frozen order total
//! DELETE /api/v1/orders/{id}               - Cancel an order
//! ```

pub mod books;
pub mod carts;
pub mod orders;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the book routes router.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(books::index))
        .route("/", post(books::create))
        .route(
            "/{id}",
            get(books::show).patch(books::patch).delete(books::delete),
        )
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(users::index))
        .route("/", post(users::create))
        .route("/{id}", get(users::show).delete(users::delete))
        .route("/{user_id}/{cart_id}/confirm", post(users::confirm))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(carts::index))
        .route("/", post(carts::create))
        .route("/{id}", get(carts::show).delete(carts::delete))
        .route("/{id}/books", get(carts::books))
        .route("/{id}/total", get(carts::total))
        .route(
            "/{cart_id}/add/{book_id}",
            post(carts::add).delete(carts::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/all", get(orders::index))
        .route("/filter", get(orders::filter))
        .route("/{id}", get(orders::show).delete(orders::cancel))
        .route("/{id}/total", get(orders::total))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/v1/books", book_routes())
        .nest("/api/v1/users", user_routes())
        .nest("/api/v1/carts", cart_routes())
        .nest("/api/v1/orders", order_routes())
}

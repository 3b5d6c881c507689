//! Integration tests for the API router.
//!
//! The router is built over the in-memory stores and driven directly with
//! `tower::ServiceExt::oneshot` - no socket, no database.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use colophon_api::state::AppState;
use colophon_api::stores::Stores;

fn setup() -> Router {
    colophon_api::app(AppState::new(Stores::memory()))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        // Some error paths (extractor rejections) return a plain-text body
        // rather than JSON; callers of those only assert on the status code.
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

fn as_decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

/// Create a user and return its id.
async fn create_user(app: &Router, username: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/users",
        Some(json!({ "username": username, "credential": "s3cret" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

/// Create a book and return its id.
async fn create_book(app: &Router, title: &str, price: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/books",
        Some(json!({ "title": title, "author": "Anonymous", "price": price })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

/// Create an empty cart for a user and return its id.
async fn create_cart(app: &Router, user_id: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/carts",
        Some(json!({ "user_id": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_book_crud() {
    let app = setup();

    let id = create_book(&app, "The Left Hand of Darkness", "9.99").await;

    let (status, book) = send(&app, "GET", &format!("/api/v1/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["title"], "The Left Hand of Darkness");
    assert_eq!(as_decimal(&book["price"]), Decimal::from_str("9.99").unwrap());

    let (status, books) = send(&app, "GET", "/api/v1/books/all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/v1/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_patch_is_allow_listed() {
    let app = setup();
    let id = create_book(&app, "Draft Title", "10.00").await;

    let (status, book) = send(
        &app,
        "PATCH",
        &format!("/api/v1/books/{id}"),
        Some(json!({ "title": "Final Title", "price": "12.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["title"], "Final Title");
    assert_eq!(book["author"], "Anonymous");
    assert_eq!(as_decimal(&book["price"]), Decimal::from_str("12.50").unwrap());

    // A patch with no recognized fields is rejected.
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/v1/books/{id}"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A negative price is rejected at deserialization.
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/v1/books/{id}"),
        Some(json!({ "price": "-1.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/v1/books/999",
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_responses_omit_credential() {
    let app = setup();
    let id = create_user(&app, "ursula").await;

    let (status, user) = send(&app, "GET", &format!("/api/v1/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "ursula");
    assert!(user.get("credential").is_none());

    let (_, users) = send(&app, "GET", "/api/v1/users/all", None).await;
    assert!(users[0].get("credential").is_none());
}

#[tokio::test]
async fn test_cart_requires_existing_user() {
    let app = setup();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/carts",
        Some(json!({ "user_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_book_accumulates_and_validates() {
    let app = setup();
    let user = create_user(&app, "reader").await;
    let book = create_book(&app, "Dune", "9.99").await;
    let cart = create_cart(&app, user).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/carts/{cart}/add/{book}?quantity=2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, updated) = send(
        &app,
        "POST",
        &format!("/api/v1/carts/{cart}/add/{book}?quantity=3"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["books"][book.to_string()], 5);

    // Non-positive quantities are a client error.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/carts/{cart}/add/{book}?quantity=0"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("quantity"));

    // Unknown book.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/carts/{cart}/add/999?quantity=1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown cart.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/carts/999/add/{book}?quantity=1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_book_is_wholesale_and_checked() {
    let app = setup();
    let user = create_user(&app, "reader").await;
    let book = create_book(&app, "Dune", "9.99").await;
    let cart = create_cart(&app, user).await;

    send(
        &app,
        "POST",
        &format!("/api/v1/carts/{cart}/add/{book}?quantity=4"),
        None,
    )
    .await;

    // Removing a book that was never added fails and changes nothing.
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/carts/{cart}/add/999"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, books) = send(&app, "GET", &format!("/api/v1/carts/{cart}/books"), None).await;
    assert_eq!(books[book.to_string()], 4);

    // Removal deletes the whole entry, not one copy.
    let (status, updated) = send(
        &app,
        "DELETE",
        &format!("/api/v1/carts/{cart}/add/{book}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["books"], json!({}));
}

#[tokio::test]
async fn test_cart_books_is_never_null() {
    let app = setup();
    let user = create_user(&app, "reader").await;
    let cart = create_cart(&app, user).await;

    let (status, books) = send(&app, "GET", &format!("/api/v1/carts/{cart}/books"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books, json!({}));
}

#[tokio::test]
async fn test_cart_total_is_live() {
    let app = setup();
    let user = create_user(&app, "reader").await;
    let book_a = create_book(&app, "A", "10.0").await;
    let book_b = create_book(&app, "B", "5.0").await;
    let cart = create_cart(&app, user).await;

    let (_, total) = send(&app, "GET", &format!("/api/v1/carts/{cart}/total"), None).await;
    assert_eq!(as_decimal(&total), Decimal::ZERO);

    send(
        &app,
        "POST",
        &format!("/api/v1/carts/{cart}/add/{book_a}?quantity=2"),
        None,
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/v1/carts/{cart}/add/{book_b}?quantity=1"),
        None,
    )
    .await;

    let (_, total) = send(&app, "GET", &format!("/api/v1/carts/{cart}/total"), None).await;
    assert_eq!(as_decimal(&total), Decimal::from_str("25.0").unwrap());

    // Deleting a book from the catalog silently prices its line at zero.
    send(&app, "DELETE", &format!("/api/v1/books/{book_a}"), None).await;
    let (_, total) = send(&app, "GET", &format!("/api/v1/carts/{cart}/total"), None).await;
    assert_eq!(as_decimal(&total), Decimal::from_str("5.0").unwrap());
}

#[tokio::test]
async fn test_checkout_converts_and_deletes_cart() {
    let app = setup();
    let user = create_user(&app, "reader").await;
    let book_a = create_book(&app, "A", "10.0").await;
    let book_b = create_book(&app, "B", "5.0").await;
    let cart = create_cart(&app, user).await;

    send(
        &app,
        "POST",
        &format!("/api/v1/carts/{cart}/add/{book_a}?quantity=2"),
        None,
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/v1/carts/{cart}/add/{book_b}?quantity=1"),
        None,
    )
    .await;

    let (status, order) = send(
        &app,
        "POST",
        &format!("/api/v1/users/{user}/{cart}/confirm"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_decimal(&order["total"]), Decimal::from_str("25.0").unwrap());
    assert_eq!(order["user_id"], user);
    assert_eq!(order["books"][book_a.to_string()], 2);
    assert_eq!(order["books"][book_b.to_string()], 1);

    // The conversion is destructive: the cart is gone.
    let (status, _) = send(&app, "GET", &format!("/api/v1/carts/{cart}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Exactly one order exists and its total endpoint agrees.
    let (_, orders) = send(&app, "GET", "/api/v1/orders/all", None).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);

    let order_id = order["id"].as_i64().unwrap();
    let (status, total) = send(
        &app,
        "GET",
        &format!("/api/v1/orders/{order_id}/total"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_decimal(&total), Decimal::from_str("25.0").unwrap());
}

#[tokio::test]
async fn test_checkout_rejects_foreign_cart() {
    let app = setup();
    let owner = create_user(&app, "owner").await;
    let intruder = create_user(&app, "intruder").await;
    let cart = create_cart(&app, owner).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/users/{intruder}/{cart}/confirm"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // No order was created and the cart is untouched.
    let (_, orders) = send(&app, "GET", "/api/v1/orders/all", None).await;
    assert_eq!(orders, json!([]));
    let (status, _) = send(&app, "GET", &format!("/api/v1/carts/{cart}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_checkout_unknown_user_or_cart() {
    let app = setup();
    let user = create_user(&app, "reader").await;
    let cart = create_cart(&app, user).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/users/999/{cart}/confirm"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/users/{user}/999/confirm"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_filter_by_date() {
    let app = setup();
    let user = create_user(&app, "reader").await;
    let cart = create_cart(&app, user).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/users/{user}/{cart}/confirm"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let today = chrono::Utc::now().date_naive();
    let (status, orders) = send(
        &app,
        "GET",
        &format!("/api/v1/orders/filter?date={today}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);

    let (status, orders) = send(&app, "GET", "/api/v1/orders/filter?date=1970-01-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders, json!([]));

    // Unparseable dates are a client error.
    let (status, _) = send(&app, "GET", "/api/v1/orders/filter?date=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_order_is_a_hard_delete() {
    let app = setup();
    let user = create_user(&app, "reader").await;
    let cart = create_cart(&app, user).await;

    let (_, order) = send(
        &app,
        "POST",
        &format!("/api/v1/users/{user}/{cart}/confirm"),
        None,
    )
    .await;
    let order_id = order["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/v1/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Cancelling a nonexistent order fails and changes nothing.
    let (status, _) = send(&app, "DELETE", &format!("/api/v1/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

//! Cart handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use colophon_core::{BookId, CartId};

use crate::error::{AppError, Result};
use crate::models::{Cart, NewCart};
use crate::state::AppState;

/// Query parameters for adding a book to a cart.
#[derive(Debug, Deserialize)]
pub struct AddParams {
    pub quantity: i32,
}

/// GET /api/v1/carts/all - list all carts and their items.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Cart>>> {
    let carts = state.stores().carts.find_all().await?;
    Ok(Json(carts))
}

/// GET /api/v1/carts/{id} - fetch one cart.
pub async fn show(State(state): State<AppState>, Path(id): Path<CartId>) -> Result<Json<Cart>> {
    let cart = state
        .stores()
        .carts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id}")))?;

    Ok(Json(cart))
}

/// GET /api/v1/carts/{id}/books - the books mapping of a cart.
///
/// Always a map, never null; an empty cart yields `{}`.
pub async fn books(
    State(state): State<AppState>,
    Path(id): Path<CartId>,
) -> Result<Json<BTreeMap<BookId, i32>>> {
    let books = state.cart().view_books(id).await?;
    Ok(Json(books))
}

/// GET /api/v1/carts/{id}/total - the live total price of a cart.
pub async fn total(
    State(state): State<AppState>,
    Path(id): Path<CartId>,
) -> Result<Json<Decimal>> {
    let total = state.cart().total_price(id).await?;
    Ok(Json(total))
}

/// POST /api/v1/carts - create a cart, empty or with initial contents.
#[tracing::instrument(skip(state, cart), fields(user_id = %cart.user_id))]
pub async fn create(
    State(state): State<AppState>,
    Json(cart): Json<NewCart>,
) -> Result<(StatusCode, Json<Cart>)> {
    let cart = state.cart().create_cart(cart).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// POST /api/v1/carts/{cart_id}/add/{book_id}?quantity=N - add a book.
#[tracing::instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Path((cart_id, book_id)): Path<(CartId, BookId)>,
    Query(params): Query<AddParams>,
) -> Result<Json<Cart>> {
    let cart = state
        .cart()
        .add_book(cart_id, book_id, params.quantity)
        .await?;

    Ok(Json(cart))
}

/// DELETE /api/v1/carts/{cart_id}/add/{book_id} - remove a book's entry.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path((cart_id, book_id)): Path<(CartId, BookId)>,
) -> Result<Json<Cart>> {
    let cart = state.cart().remove_book(cart_id, book_id).await?;
    Ok(Json(cart))
}

/// DELETE /api/v1/carts/{id} - delete a cart.
#[tracing::instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<CartId>) -> Result<StatusCode> {
    state.cart().delete_cart(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

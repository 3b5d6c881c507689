//! Book catalog handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use colophon_core::BookId;

use crate::error::{AppError, Result};
use crate::models::{Book, BookPatch, NewBook};
use crate::state::AppState;

/// GET /api/v1/books/all - list the catalog.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Book>>> {
    let books = state.stores().books.find_all().await?;
    Ok(Json(books))
}

/// GET /api/v1/books/{id} - fetch one book.
pub async fn show(State(state): State<AppState>, Path(id): Path<BookId>) -> Result<Json<Book>> {
    let book = state
        .stores()
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("book {id}")))?;

    Ok(Json(book))
}

/// POST /api/v1/books - add a book to the catalog.
#[tracing::instrument(skip(state, book), fields(title = %book.title))]
pub async fn create(
    State(state): State<AppState>,
    Json(book): Json<NewBook>,
) -> Result<(StatusCode, Json<Book>)> {
    let book = state.stores().books.create(book).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// PATCH /api/v1/books/{id} - apply an allow-listed field patch.
#[tracing::instrument(skip(state, patch))]
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<BookId>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<Book>> {
    if patch.is_empty() {
        return Err(AppError::BadRequest("patch contains no fields".to_owned()));
    }

    let book = state
        .stores()
        .books
        .update_fields(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("book {id}")))?;

    Ok(Json(book))
}

/// DELETE /api/v1/books/{id} - remove a book from the catalog.
///
/// Cart and order entries referencing the book are left in place; pricing
/// treats them as contributing zero from now on.
#[tracing::instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<BookId>) -> Result<StatusCode> {
    if state.stores().books.delete_by_id(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("book {id}")))
    }
}

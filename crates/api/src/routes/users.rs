//! User handlers, including the checkout confirmation endpoint.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use colophon_core::{CartId, UserId};

use crate::error::{AppError, Result};
use crate::models::{NewUser, Order, User};
use crate::state::AppState;

/// POST /api/v1/users - register a user.
///
/// The credential never appears in the response body.
#[tracing::instrument(skip(state, user), fields(username = %user.username))]
pub async fn create(
    State(state): State<AppState>,
    Json(user): Json<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.stores().users.create(user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/all - list users.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = state.stores().users.find_all().await?;
    Ok(Json(users))
}

/// GET /api/v1/users/{id} - fetch one user.
pub async fn show(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Json<User>> {
    let user = state
        .stores()
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    Ok(Json(user))
}

/// DELETE /api/v1/users/{id} - delete a user.
#[tracing::instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<StatusCode> {
    if state.stores().users.delete_by_id(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("user {id}")))
    }
}

/// POST /api/v1/users/{user_id}/{cart_id}/confirm - convert the user's cart
/// into an order.
#[tracing::instrument(skip(state))]
pub async fn confirm(
    State(state): State<AppState>,
    Path((user_id, cart_id)): Path<(UserId, CartId)>,
) -> Result<Json<Order>> {
    let order = state.checkout().confirm_and_convert(user_id, cart_id).await?;
    Ok(Json(order))
}

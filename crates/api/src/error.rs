//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::{CartError, CheckoutError};
use crate::stores::StoreError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    /// Cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout workflow failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is the server's fault rather than the client's.
    const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Store(_)
                | Self::Internal(_)
                | Self::Cart(CartError::Store(_))
                | Self::Checkout(CheckoutError::Store(_))
        )
    }

    const fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cart(err) => match err {
                CartError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
                CartError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CartError::CartNotFound(_)
                | CartError::BookNotFound(_)
                | CartError::UserNotFound(_)
                | CartError::BookNotInCart(_) => StatusCode::NOT_FOUND,
            },
            Self::Checkout(err) => match err {
                CheckoutError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CheckoutError::UserNotFound(_) | CheckoutError::CartNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server faults to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status_code();

        // Don't expose internal error details to clients
        let message = if self.is_server_fault() {
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use colophon_core::{BookId, CartId, UserId};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("book 123".to_owned());
        assert_eq!(err.to_string(), "Not found: book 123");

        let err = AppError::BadRequest("invalid input".to_owned());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        // Domain errors pass their message through untouched.
        let err = AppError::Cart(CartError::BookNotInCart(BookId::new(4)));
        assert_eq!(err.to_string(), "book 4 is not in the cart");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_cart_error_status_codes() {
        assert_eq!(
            get_status(AppError::Cart(CartError::InvalidQuantity(0))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::CartNotFound(CartId::new(1)))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::BookNotFound(BookId::new(1)))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_checkout_error_status_codes() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::UserNotFound(
                UserId::new(1)
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::CartNotFound {
                cart_id: CartId::new(1),
                user_id: UserId::new(2),
            })),
            StatusCode::NOT_FOUND
        );
    }
}

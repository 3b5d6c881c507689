//! Colophon API library.
//!
//! This crate provides the bookstore backend as a library, allowing the
//! router to be built over any store backend (`PostgreSQL` in production,
//! in-memory in tests) and driven without a running server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stores;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Creates the Axum application router with all routes and shared state.
#[must_use]
pub fn app(state: AppState) -> Router {
    routes::routes()
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

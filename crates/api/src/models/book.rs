//! Book catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use colophon_core::{BookId, Price};

/// A book in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Unique book ID.
    pub id: BookId,
    /// Title.
    pub title: String,
    /// Author display name.
    pub author: String,
    /// Current list price. Always non-negative.
    pub price: Price,
    /// When the book was added to the catalog.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a book.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price: Price,
}

/// An allow-listed partial update for a book.
///
/// Only the fields present here can be patched; absent fields are left
/// untouched. This replaces a free-form key/value update surface with a
/// statically typed one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<Price>,
}

impl BookPatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.price.is_none()
    }
}

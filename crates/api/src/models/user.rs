//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use colophon_core::UserId;

/// A registered user.
///
/// The credential is write-only at the API surface: it is skipped during
/// serialization, so it never appears in a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display / login name. Not unique (matches the legacy data).
    pub username: String,
    /// Opaque login credential.
    #[serde(skip_serializing)]
    pub credential: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewUser {
    pub username: String,
    pub credential: String,
}

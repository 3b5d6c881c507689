//! Shopping cart types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use colophon_core::{BookId, CartId, UserId};

/// A per-user mutable basket of book → quantity entries, pending checkout.
///
/// Invariant: every quantity is positive. Entries leave the map only through
/// wholesale removal; there is no decrement operation, so a quantity can
/// never reach zero in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// The one user this cart belongs to.
    pub user_id: UserId,
    /// Book quantities. Always a map; an empty cart is an empty map.
    pub books: BTreeMap<BookId, i32>,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a cart, empty or with initial contents.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCart {
    pub user_id: UserId,
    /// Initial contents; defaults to empty.
    #[serde(default)]
    pub books: BTreeMap<BookId, i32>,
}

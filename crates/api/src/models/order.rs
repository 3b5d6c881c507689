//! Order types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use colophon_core::{BookId, OrderId, UserId};

/// An immutable, priced, timestamped record of a completed purchase.
///
/// Orders are created exclusively by the checkout workflow as a snapshot of
/// the source cart: the book quantities are a value copy taken at conversion
/// time and the total is frozen. The only mutation an order ever sees is
/// cancellation, which deletes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The user who placed the order.
    pub user_id: UserId,
    /// Book quantities copied from the source cart at conversion time.
    pub books: BTreeMap<BookId, i32>,
    /// Total frozen at conversion time.
    pub total: Decimal,
    /// When the cart was converted.
    pub order_date: DateTime<Utc>,
}

/// An order about to be persisted by the checkout workflow.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub books: BTreeMap<BookId, i32>,
    pub total: Decimal,
    pub order_date: DateTime<Utc>,
}

impl NewOrder {
    /// Attach the store-assigned ID to produce the persisted form.
    #[must_use]
    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            user_id: self.user_id,
            books: self.books,
            total: self.total,
            order_date: self.order_date,
        }
    }
}

//! Order query and cancellation handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use colophon_core::OrderId;

use crate::error::{AppError, Result};
use crate::models::Order;
use crate::state::AppState;

/// Query parameters for date filtering.
#[derive(Debug, Deserialize)]
pub struct FilterParams {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: NaiveDate,
}

/// GET /api/v1/orders/all - list every order.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = state.stores().orders.find_all().await?;
    Ok(Json(orders))
}

/// GET /api/v1/orders/filter?date=YYYY-MM-DD - orders placed on a calendar
/// day (UTC), inclusive of the whole day.
pub async fn filter(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Order>>> {
    let (start, end) = day_bounds(params.date);
    let orders = state.stores().orders.find_by_date_range(start, end).await?;
    Ok(Json(orders))
}

/// GET /api/v1/orders/{id} - fetch one order.
pub async fn show(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<Json<Order>> {
    let order = state
        .stores()
        .orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(order))
}

/// GET /api/v1/orders/{id}/total - the total frozen into the order.
pub async fn total(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Decimal>> {
    let order = state
        .stores()
        .orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(order.total))
}

/// DELETE /api/v1/orders/{id} - cancel an order.
///
/// A hard delete: no restocking, no refund record, no audit trail.
#[tracing::instrument(skip(state))]
pub async fn cancel(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<StatusCode> {
    if state.stores().orders.delete_by_id(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("order {id}")))
    }
}

/// The inclusive bounds of a UTC calendar day:
/// `[00:00:00, 23:59:59.999999999]`.
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = date
        .and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
        .and_utc();
    (start, end)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (start, end) = day_bounds(date);

        assert_eq!(start.to_rfc3339(), "2024-03-15T00:00:00+00:00");
        assert!(end > start);
        assert_eq!(end.date_naive(), date);
        // One nanosecond later is the next day.
        assert_eq!(
            (end + chrono::Duration::nanoseconds(1)).date_naive(),
            date.succ_opt().unwrap()
        );
    }
}

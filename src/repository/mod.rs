//! Access to the external reservation store

pub mod http;

use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;

use crate::{
    error::AppResult,
    models::{Court, Reservation, ReservationPayload},
};

pub use http::HttpStore;

/// Operations the panel needs from the store.
///
/// The store does not check overlaps; callers validate availability
/// before `create` and `update`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// `GET /courts`
    async fn list_courts(&self) -> AppResult<Vec<Court>>;

    /// `GET /reservations?date=YYYY-MM-DD`
    async fn list_day(&self, date: NaiveDate) -> AppResult<Vec<Reservation>>;

    /// `GET /reservations/range?from=..&to=..`, both bounds inclusive
    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Reservation>>;

    /// `POST /reservations`
    async fn create(&self, payload: &ReservationPayload) -> AppResult<Reservation>;

    /// `PUT /reservations/{id}`
    async fn update(&self, id: i64, payload: &ReservationPayload) -> AppResult<Reservation>;

    /// `PUT /reservations/{id}/cancel`
    async fn cancel(&self, id: i64) -> AppResult<()>;

    /// `PUT /reservations/{id}/payment` with `{markPaidFull: true}`
    async fn mark_paid(&self, id: i64) -> AppResult<Reservation>;
}

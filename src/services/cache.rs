//! Session-scoped reservation cache keyed by day

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::Reservation,
    repository::ReservationStore,
};

/// Reservations fetched from the store, filed under their start date.
///
/// A day that is present with an empty list has no reservations; a day that
/// is absent has not been loaded yet. Entries never expire and are replaced
/// by the next load of their day or month.
pub struct ReservationCache {
    store: Arc<dyn ReservationStore>,
    days: BTreeMap<NaiveDate, Vec<Reservation>>,
}

impl ReservationCache {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self {
            store,
            days: BTreeMap::new(),
        }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&[Reservation]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Drop a day so the next read fetches it again
    pub fn invalidate(&mut self, date: NaiveDate) {
        self.days.remove(&date);
    }

    /// Cached days within `[from, to]`
    pub fn range(&self, from: NaiveDate, to: NaiveDate) -> BTreeMap<NaiveDate, &[Reservation]> {
        self.days
            .range(from..=to)
            .map(|(date, rows)| (*date, rows.as_slice()))
            .collect()
    }

    /// Look a reservation up in every cached day
    pub fn find(&self, id: i64) -> Option<&Reservation> {
        self.days.values().flatten().find(|r| r.id == id)
    }

    /// Fetch a whole month in one request.
    ///
    /// On success every day of the month has an entry, possibly empty. On
    /// failure nothing cached is touched.
    pub async fn load_month(&mut self, year: i32, month: u32) -> AppResult<()> {
        let (first, last) = month_bounds(year, month)?;
        tracing::debug!("Loading reservations for {}-{:02}", year, month);

        let rows = self.store.list_range(first, last).await?;

        let mut grouped: BTreeMap<NaiveDate, Vec<Reservation>> = first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|d| (d, Vec::new()))
            .collect();
        for reservation in rows {
            grouped.entry(reservation.date()).or_default().push(reservation);
        }

        tracing::debug!(
            "Loaded {}-{:02}: {} days, {} reservations",
            year,
            month,
            grouped.len(),
            grouped.values().map(Vec::len).sum::<usize>()
        );
        self.days.extend(grouped);
        Ok(())
    }

    /// Fetch one day, replacing its entry
    pub async fn load_day(&mut self, date: NaiveDate) -> AppResult<&[Reservation]> {
        let rows = self.store.list_day(date).await?;
        tracing::debug!("Loaded {}: {} reservations", date, rows.len());

        let entry = self.days.entry(date).or_default();
        *entry = rows;
        Ok(entry.as_slice())
    }

    /// Like [`load_day`](Self::load_day), but a failure leaves the last known
    /// entry for the day (or an empty one) instead of an error
    pub async fn load_day_safe(&mut self, date: NaiveDate) -> &[Reservation] {
        match self.store.list_day(date).await {
            Ok(rows) => {
                tracing::debug!("Loaded {}: {} reservations", date, rows.len());
                self.days.insert(date, rows);
            }
            Err(e) => {
                let degraded = AppError::DegradedLoad {
                    date,
                    reason: e.to_string(),
                };
                tracing::warn!("{}", degraded);
            }
        }
        self.days.entry(date).or_default().as_slice()
    }

    /// Cached day, fetched first if the day was never loaded
    pub async fn ensure_day(&mut self, date: NaiveDate) -> AppResult<&[Reservation]> {
        if !self.contains(date) {
            self.load_day(date).await?;
        }
        Ok(self.day(date).unwrap_or_default())
    }

    /// Cached day, falling back to [`load_day_safe`](Self::load_day_safe)
    pub async fn ensure_day_safe(&mut self, date: NaiveDate) -> &[Reservation] {
        if !self.contains(date) {
            return self.load_day_safe(date).await;
        }
        self.day(date).unwrap_or_default()
    }
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Format(format!("Invalid month {}-{:02}", year, month)))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AppError::Format(format!("Invalid month {}-{:02}", year, month)))?;
    debug_assert_eq!(last.month(), month);
    Ok((first, last))
}

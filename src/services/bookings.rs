//! Booking lifecycle: create, edit, cancel and settle reservations

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{check_duration, SlotSelection},
        BookingDraft, Court, DraftField, PaymentStatus, Reservation,
        ReservationPayload,
    },
    repository::ReservationStore,
    scheduling::{
        availability::{AvailabilityQuery, TimeOption},
        occupancy::DayOccupancy,
        time::HALF_HOUR_SLOTS,
    },
    services::cache::ReservationCache,
};

/// One owner's panel session: courts, reservation cache and the
/// operations that mutate the store.
///
/// Every mutation refreshes the affected day(s) afterwards, so the cache
/// only ever shows what round-tripped through the store.
pub struct BookingService {
    store: Arc<dyn ReservationStore>,
    cache: ReservationCache,
    courts: Vec<Court>,
    default_duration: u32,
}

impl BookingService {
    pub fn new(store: Arc<dyn ReservationStore>, default_duration: u32) -> Self {
        Self {
            cache: ReservationCache::new(store.clone()),
            store,
            courts: Vec::new(),
            default_duration,
        }
    }

    pub fn default_duration(&self) -> u32 {
        self.default_duration
    }

    pub fn cache(&self) -> &ReservationCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ReservationCache {
        &mut self.cache
    }

    // ---- Courts ----

    /// Fetch the owner's courts, replacing the session copy
    pub async fn load_courts(&mut self) -> AppResult<&[Court]> {
        self.courts = self.store.list_courts().await?;
        tracing::debug!("Loaded {} courts", self.courts.len());
        Ok(&self.courts)
    }

    /// Session courts, fetched on first use
    pub async fn courts(&mut self) -> AppResult<&[Court]> {
        if self.courts.is_empty() {
            return self.load_courts().await;
        }
        Ok(&self.courts)
    }

    pub fn active_courts(&self) -> impl Iterator<Item = &Court> {
        self.courts.iter().filter(|c| c.is_active)
    }

    fn active_court(&self, court_id: i64) -> AppResult<&Court> {
        self.active_courts()
            .find(|c| c.id == court_id)
            .ok_or_else(|| {
                AppError::validation(DraftField::Court, format!("Court {} is not available", court_id))
            })
    }

    /// Reservation known to the session cache
    pub fn reservation(&self, id: i64) -> AppResult<Reservation> {
        self.cache
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))
    }

    // ---- Availability ----

    /// Start-time picker for a court and day
    pub async fn time_options(
        &mut self,
        court_id: i64,
        date: NaiveDate,
        duration_minutes: u32,
        now: NaiveDateTime,
        excluding: Option<i64>,
    ) -> AppResult<Vec<TimeOption>> {
        check_duration(duration_minutes)?;
        let query = AvailabilityQuery {
            court_id,
            day: date,
            duration_minutes,
            now,
            excluding,
        };
        let day = self.cache.ensure_day(date).await?;
        let occupancy = DayOccupancy::build(date, day);
        Ok(query.time_options(&occupancy))
    }

    /// Check a draft and turn it into a store payload.
    ///
    /// Order: court, date, start, duration, slot availability, client.
    async fn prepare(
        &mut self,
        draft: &BookingDraft,
        now: NaiveDateTime,
        excluding: Option<i64>,
    ) -> AppResult<ReservationPayload> {
        let selection = draft.slot_selection()?;
        self.courts().await?;
        let hourly_price = self.active_court(selection.court_id)?.hourly_price;

        if !HALF_HOUR_SLOTS.contains(&selection.start) {
            return Err(AppError::validation(
                DraftField::Start,
                format!("{} is not a bookable slot", selection.start),
            ));
        }
        self.check_available(&selection, now, excluding).await?;
        draft.check_client()?;

        let start_at = selection.date.and_time(selection.start.to_naive_time());
        let end_at = start_at + chrono::Duration::minutes(selection.duration_minutes as i64);

        Ok(ReservationPayload {
            court_id: selection.court_id,
            start_at,
            end_at,
            total_amount: hourly_price * Decimal::from(selection.duration_minutes)
                / Decimal::from(60),
            paid_amount: Decimal::ZERO,
            payment_method: None,
            payment_status: PaymentStatus::Pending,
            notes: draft.encoded_notes(),
        })
    }

    async fn check_available(
        &mut self,
        selection: &SlotSelection,
        now: NaiveDateTime,
        excluding: Option<i64>,
    ) -> AppResult<()> {
        let query = AvailabilityQuery {
            court_id: selection.court_id,
            day: selection.date,
            duration_minutes: selection.duration_minutes,
            now,
            excluding,
        };
        let day = self.cache.ensure_day(selection.date).await?;
        let occupancy = DayOccupancy::build(selection.date, day);
        let status = query.slot_status(&occupancy, selection.start);
        if status.is_disabled() {
            return Err(AppError::Conflict(format!(
                "Slot {} on {} is not available ({:?})",
                selection.start, selection.date, status
            )));
        }
        Ok(())
    }

    // ---- Lifecycle ----

    pub async fn create(&mut self, draft: &BookingDraft, now: NaiveDateTime) -> AppResult<Reservation> {
        let payload = self.prepare(draft, now, None).await?;

        let created = self.store.create(&payload).await?;
        tracing::info!(
            "Created reservation {} on court {} at {}",
            created.id,
            created.court_id,
            created.start_at
        );

        self.cache.load_day_safe(payload.start_at.date()).await;
        Ok(created)
    }

    /// Apply a draft to an existing reservation.
    ///
    /// Tries an in-place update first. If the store rejects it, the original
    /// is cancelled and a new reservation created with the draft's values,
    /// strictly in that order. The returned reservation may therefore have a
    /// different id than `existing`.
    pub async fn edit(
        &mut self,
        existing: &Reservation,
        draft: &BookingDraft,
        now: NaiveDateTime,
    ) -> AppResult<Reservation> {
        if !existing.is_active() {
            return Err(AppError::InvalidTransition {
                from: existing.payment_status,
                to: PaymentStatus::Pending,
            });
        }
        let mut payload = self.prepare(draft, now, Some(existing.id)).await?;
        carry_payment(existing, &mut payload)?;

        let touched: BTreeSet<NaiveDate> = [existing.date(), payload.start_at.date()].into();
        let result = self.apply_edit(existing, &payload).await;

        for date in touched {
            self.cache.load_day_safe(date).await;
        }
        result
    }

    async fn apply_edit(
        &self,
        existing: &Reservation,
        payload: &ReservationPayload,
    ) -> AppResult<Reservation> {
        match self.store.update(existing.id, payload).await {
            Ok(updated) => {
                tracing::info!("Updated reservation {} in place", updated.id);
                Ok(updated)
            }
            Err(e @ AppError::Unauthorized(_)) => Err(e),
            Err(e) => {
                tracing::warn!(
                    "In-place update of reservation {} failed ({}), replacing it",
                    existing.id,
                    e
                );
                self.store.cancel(existing.id).await?;
                let created = self.store.create(payload).await.map_err(|e| {
                    tracing::error!(
                        "Reservation {} was cancelled but its replacement failed: {}",
                        existing.id,
                        e
                    );
                    e
                })?;
                tracing::info!("Replaced reservation {} with {}", existing.id, created.id);
                Ok(created)
            }
        }
    }

    pub async fn cancel(&mut self, reservation: &Reservation) -> AppResult<()> {
        ensure_transition(reservation, PaymentStatus::Cancelled)?;

        self.store.cancel(reservation.id).await?;
        tracing::info!("Cancelled reservation {}", reservation.id);

        self.cache.load_day_safe(reservation.date()).await;
        Ok(())
    }

    /// Settle the full amount
    pub async fn mark_paid(&mut self, reservation: &Reservation) -> AppResult<Reservation> {
        ensure_transition(reservation, PaymentStatus::Paid)?;

        let updated = self.store.mark_paid(reservation.id).await?;
        tracing::info!(
            "Reservation {} paid ({})",
            reservation.id,
            updated.total_amount
        );

        self.cache.load_day_safe(reservation.date()).await;
        Ok(updated)
    }
}

/// Keep what was already paid on an edited reservation.
///
/// The status follows the amounts against the new total; a change that the
/// status machine forbids (a paid booking extended past its payment) is
/// rejected before anything is sent.
fn carry_payment(existing: &Reservation, payload: &mut ReservationPayload) -> AppResult<()> {
    let next = PaymentStatus::from_amounts(payload.total_amount, existing.paid_amount);
    if next != existing.payment_status {
        ensure_transition(existing, next)?;
    }
    payload.paid_amount = existing.paid_amount;
    payload.payment_method = existing.payment_method.clone();
    payload.payment_status = next;
    Ok(())
}

fn ensure_transition(reservation: &Reservation, to: PaymentStatus) -> AppResult<()> {
    if reservation.payment_status.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            from: reservation.payment_status,
            to,
        })
    }
}

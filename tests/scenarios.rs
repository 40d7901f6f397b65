//! Booking scenarios against an in-memory reservation store

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tokio_test::{assert_err, assert_ok};

use canchas_panel::{
    error::{AppError, AppResult},
    models::{BookingDraft, Court, PaymentStatus, Reservation, ReservationPayload},
    repository::ReservationStore,
    scheduling::{notes, AvailabilityQuery, DayOccupancy, SlotTime},
    services::BookingService,
};

/// Store double: keeps reservations in memory, never checks overlaps,
/// and records every mutating call.
#[derive(Default)]
struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    courts: Vec<Court>,
    reservations: Vec<Reservation>,
    next_id: i64,
    calls: Vec<String>,
    reject_updates: bool,
}

impl MemoryStore {
    fn with_court(id: i64, name: &str, price: i64) -> Self {
        let store = MemoryStore::default();
        store.state.lock().unwrap().courts.push(Court {
            id,
            name: name.to_string(),
            hourly_price: Decimal::from(price),
            is_active: true,
            complex_id: Some(1),
        });
        store
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn active(&self) -> Vec<Reservation> {
        self.state
            .lock()
            .unwrap()
            .reservations
            .iter()
            .filter(|r| r.is_active())
            .cloned()
            .collect()
    }

    fn reject_updates(&self) {
        self.state.lock().unwrap().reject_updates = true;
    }
}

fn materialize(id: i64, p: &ReservationPayload) -> Reservation {
    Reservation {
        id,
        court_id: p.court_id,
        court_name: None,
        start_at: p.start_at,
        end_at: p.end_at,
        total_amount: p.total_amount,
        paid_amount: p.paid_amount,
        payment_method: p.payment_method.clone(),
        payment_status: PaymentStatus::from_amounts(p.total_amount, p.paid_amount),
        notes: p.notes.clone(),
    }
}

fn missing(id: i64) -> AppError {
    AppError::Network(format!("Reservation {} does not exist", id))
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn list_courts(&self) -> AppResult<Vec<Court>> {
        Ok(self.state.lock().unwrap().courts.clone())
    }

    async fn list_day(&self, date: NaiveDate) -> AppResult<Vec<Reservation>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reservations
            .iter()
            .filter(|r| r.date() == date)
            .cloned()
            .collect())
    }

    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Reservation>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reservations
            .iter()
            .filter(|r| r.date() >= from && r.date() <= to)
            .cloned()
            .collect())
    }

    async fn create(&self, payload: &ReservationPayload) -> AppResult<Reservation> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = materialize(state.next_id, payload);
        state.calls.push(format!("create {}", created.id));
        state.reservations.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, payload: &ReservationPayload) -> AppResult<Reservation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update {}", id));
        if state.reject_updates {
            return Err(AppError::Network("Method not allowed".to_string()));
        }
        let slot = state
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| missing(id))?;
        *slot = materialize(id, payload);
        Ok(slot.clone())
    }

    async fn cancel(&self, id: i64) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("cancel {}", id));
        let slot = state
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| missing(id))?;
        slot.payment_status = PaymentStatus::Cancelled;
        Ok(())
    }

    async fn mark_paid(&self, id: i64) -> AppResult<Reservation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("pay {}", id));
        let slot = state
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| missing(id))?;
        slot.paid_amount = slot.total_amount;
        slot.payment_status = PaymentStatus::Paid;
        Ok(slot.clone())
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()
}

fn morning_before() -> NaiveDateTime {
    day().and_hms_opt(7, 0, 0).unwrap()
}

fn slot(s: &str) -> SlotTime {
    s.parse().unwrap()
}

fn draft(start: &str, duration_minutes: u32, name: &str, phone: &str) -> BookingDraft {
    BookingDraft {
        court_id: Some(1),
        date: Some(day()),
        start: Some(slot(start)),
        duration_minutes,
        client_name: name.to_string(),
        client_phone: phone.to_string(),
        note: String::new(),
    }
}

fn setup() -> (Arc<MemoryStore>, BookingService) {
    let store = Arc::new(MemoryStore::with_court(1, "Cancha 1", 80));
    let service = BookingService::new(store.clone(), 60);
    (store, service)
}

fn occupied_slots(service: &BookingService) -> Vec<SlotTime> {
    let rows = service.cache().day(day()).unwrap_or_default();
    let occupancy = DayOccupancy::build(day(), rows);
    occupancy.court_slots(1).map(|(s, _)| s).collect()
}

#[tokio::test]
async fn simple_booking_occupies_its_slots() {
    let (_store, mut service) = setup();

    let created = assert_ok!(
        service
            .create(&draft("14:00", 60, "Ana", "999"), morning_before())
            .await
    );

    assert_eq!(created.total_amount, Decimal::from(80));
    assert_eq!(created.payment_status, PaymentStatus::Pending);
    assert_eq!(created.notes.as_deref(), Some("Cliente: Ana\nTel: 999"));
    assert_eq!(occupied_slots(&service), vec![slot("14:00"), slot("14:30")]);

    let decoded = notes::decode(created.notes.as_deref());
    assert_eq!(decoded.client_name, "Ana");
    assert_eq!(decoded.client_phone, "999");
}

#[tokio::test]
async fn overlapping_booking_is_rejected_before_the_store() {
    let (store, mut service) = setup();
    assert_ok!(
        service
            .create(&draft("14:00", 60, "Ana", "999"), morning_before())
            .await
    );

    let err = assert_err!(
        service
            .create(&draft("14:30", 30, "Beto", "555"), morning_before())
            .await
    );

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.calls(), vec!["create 1"]);
}

#[tokio::test]
async fn cancelling_frees_the_slots() {
    let (_store, mut service) = setup();
    let created = assert_ok!(
        service
            .create(&draft("14:00", 60, "Ana", "999"), morning_before())
            .await
    );

    assert_ok!(service.cancel(&created).await);

    assert!(occupied_slots(&service).is_empty());
    let rows = service.cache().day(day()).unwrap_or_default();
    let query = AvailabilityQuery {
        court_id: 1,
        day: day(),
        duration_minutes: 60,
        now: morning_before(),
        excluding: None,
    };
    assert!(query.is_slot_available(&DayOccupancy::build(day(), rows), slot("14:00")));
}

#[tokio::test]
async fn edit_falls_back_to_cancel_and_recreate() {
    let (store, mut service) = setup();
    let original = assert_ok!(
        service
            .create(&draft("18:00", 60, "Ana", "999"), morning_before())
            .await
    );
    store.reject_updates();

    let replaced = assert_ok!(
        service
            .edit(&original, &draft("19:00", 90, "Ana", "999"), morning_before())
            .await
    );

    assert_eq!(
        store.calls(),
        vec!["create 1", "update 1", "cancel 1", "create 2"]
    );
    assert_ne!(replaced.id, original.id);
    assert_eq!(replaced.total_amount, Decimal::from(120));

    let active = store.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, replaced.id);
    assert_eq!(
        occupied_slots(&service),
        vec![slot("19:00"), slot("19:30"), slot("20:00")]
    );
}

#[tokio::test]
async fn edit_in_place_keeps_the_id() {
    let (store, mut service) = setup();
    let original = assert_ok!(
        service
            .create(&draft("18:00", 60, "Ana", "999"), morning_before())
            .await
    );

    let updated = assert_ok!(
        service
            .edit(&original, &draft("18:30", 60, "Ana María", "999"), morning_before())
            .await
    );

    assert_eq!(updated.id, original.id);
    assert_eq!(store.calls(), vec!["create 1", "update 1"]);
    assert_eq!(occupied_slots(&service), vec![slot("18:30"), slot("19:00")]);
}

#[tokio::test]
async fn mark_paid_settles_once() {
    let (_store, mut service) = setup();
    let created = assert_ok!(
        service
            .create(&draft("10:00", 30, "Ana", "999"), morning_before())
            .await
    );

    let paid = assert_ok!(service.mark_paid(&created).await);
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.paid_amount, Decimal::from(40));

    let err = assert_err!(service.mark_paid(&paid).await);
    assert!(matches!(err, AppError::InvalidTransition { .. }));
}

#[tokio::test]
async fn no_two_active_reservations_share_a_bucket() {
    let (store, mut service) = setup();
    let attempts = [
        ("08:00", 120),
        ("09:00", 60),
        ("10:00", 90),
        ("10:30", 30),
        ("11:30", 60),
        ("12:00", 30),
        ("21:00", 120),
        ("22:00", 60),
        ("21:30", 30),
    ];

    for (start, minutes) in attempts {
        let _ = service
            .create(&draft(start, minutes, "Ana", "999"), morning_before())
            .await;
    }

    let active = store.active();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            assert!(
                a.end_at <= b.start_at || b.end_at <= a.start_at,
                "{} overlaps {}",
                a.id,
                b.id
            );
        }
    }
    // 08:00-10:00, 10:00-11:30, 11:30-12:30, 21:00-23:00
    assert_eq!(active.len(), 4);
}

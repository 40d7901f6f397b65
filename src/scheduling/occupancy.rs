//! Per-court half-hour occupancy of one day

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::models::reservation::Reservation;
use crate::scheduling::time::{SlotTime, MINUTES_PER_DAY, SLOT_MINUTES};

/// A half-hour bucket taken by a reservation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupiedSlot<'a> {
    pub reservation: &'a Reservation,
    /// First bucket of the reservation, where the block is drawn
    pub is_first_slot: bool,
}

/// Derived map `court -> slot -> reservation` for one day.
///
/// Rebuilt from the day's reservation list whenever it changes; cancelled
/// reservations never appear.
#[derive(Debug, Clone, Default)]
pub struct DayOccupancy<'a> {
    by_court: HashMap<i64, BTreeMap<SlotTime, OccupiedSlot<'a>>>,
}

impl<'a> DayOccupancy<'a> {
    pub fn build<I>(day: NaiveDate, reservations: I) -> Self
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        let mut by_court: HashMap<i64, BTreeMap<SlotTime, OccupiedSlot<'a>>> = HashMap::new();

        for reservation in reservations.into_iter().filter(|r| r.is_active()) {
            let Some((start, end)) = minutes_within(day, reservation) else {
                continue;
            };
            let first = start - start % SLOT_MINUTES as i64;
            let court = by_court.entry(reservation.court_id).or_default();

            let mut t = first;
            while t < end {
                court.insert(
                    SlotTime::from_minutes(t),
                    OccupiedSlot {
                        reservation,
                        is_first_slot: t == first && reservation.start_at.date() == day,
                    },
                );
                t += SLOT_MINUTES as i64;
            }
        }

        Self { by_court }
    }

    pub fn get(&self, court_id: i64, slot: SlotTime) -> Option<&OccupiedSlot<'a>> {
        self.by_court.get(&court_id)?.get(&slot)
    }

    pub fn is_occupied(&self, court_id: i64, slot: SlotTime) -> bool {
        self.get(court_id, slot).is_some()
    }

    /// Occupied buckets of one court, in time order
    pub fn court_slots(&self, court_id: i64) -> impl Iterator<Item = (SlotTime, &OccupiedSlot<'a>)> {
        self.by_court
            .get(&court_id)
            .into_iter()
            .flat_map(|slots| slots.iter().map(|(slot, occupied)| (*slot, occupied)))
    }
}

/// `[start, end)` of a reservation in minutes of `day`, clipped to the day
fn minutes_within(day: NaiveDate, r: &Reservation) -> Option<(i64, i64)> {
    let (start_day, end_day) = (r.start_at.date(), r.end_at.date());
    if start_day > day || end_day < day {
        return None;
    }
    let start = if start_day < day {
        0
    } else {
        r.start_slot().minutes() as i64
    };
    let end = if end_day > day {
        MINUTES_PER_DAY
    } else {
        r.end_slot().minutes() as i64
    };
    (start < end).then_some((start, end))
}

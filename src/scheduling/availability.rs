//! Slot availability for a court, day and duration

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::scheduling::{
    occupancy::DayOccupancy,
    time::{SlotTime, DAY_END_MINUTES, HALF_HOUR_SLOTS, SLOT_MINUTES},
};

/// Why a start slot can or cannot be picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SlotStatus {
    Available,
    /// Overlaps another active reservation
    Occupied,
    /// First half-hour already over (today only)
    Elapsed,
    /// Would end after the grid closes
    PastClosing,
    /// Duration is zero or not a whole number of half-hours
    InvalidDuration,
}

impl SlotStatus {
    pub fn is_disabled(self) -> bool {
        !matches!(self, SlotStatus::Available)
    }

    /// Not worth listing in the form at all
    pub fn is_hidden(self) -> bool {
        matches!(
            self,
            SlotStatus::Elapsed | SlotStatus::PastClosing | SlotStatus::InvalidDuration
        )
    }
}

/// One entry of the start-time picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeOption {
    #[schema(value_type = String, example = "14:00")]
    pub slot: SlotTime,
    /// `"14:00 a 14:30"`
    pub label: String,
    pub status: SlotStatus,
    pub disabled: bool,
}

impl TimeOption {
    pub fn new(slot: SlotTime, status: SlotStatus) -> Self {
        Self {
            slot,
            label: slot.range_label(),
            status,
            disabled: status.is_disabled(),
        }
    }
}

/// Question asked of a day's occupancy: where can a booking of
/// `duration_minutes` on `court_id` start?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub court_id: i64,
    pub day: NaiveDate,
    pub duration_minutes: u32,
    pub now: NaiveDateTime,
    /// Reservation being edited; its own buckets do not block
    pub excluding: Option<i64>,
}

impl AvailabilityQuery {
    /// Whole, non-zero number of half-hours
    pub fn has_valid_duration(&self) -> bool {
        self.duration_minutes > 0 && self.duration_minutes % SLOT_MINUTES == 0
    }

    pub fn slot_status(&self, occupancy: &DayOccupancy<'_>, start: SlotTime) -> SlotStatus {
        if !self.has_valid_duration() {
            return SlotStatus::InvalidDuration;
        }

        let start_min = start.minutes();
        let end_min = match start_min.checked_add(self.duration_minutes) {
            Some(end) if end <= DAY_END_MINUTES => end,
            _ => return SlotStatus::PastClosing,
        };

        if self.day == self.now.date() {
            let now_min = SlotTime::of(self.now).minutes();
            if start_min + SLOT_MINUTES <= now_min {
                return SlotStatus::Elapsed;
            }
        }

        let mut t = start.floor_to_slot().minutes();
        while t < end_min {
            if let Some(taken) = occupancy.get(self.court_id, SlotTime::from_minutes(t as i64)) {
                if Some(taken.reservation.id) != self.excluding {
                    return SlotStatus::Occupied;
                }
            }
            t += SLOT_MINUTES;
        }

        SlotStatus::Available
    }

    pub fn is_slot_available(&self, occupancy: &DayOccupancy<'_>, start: SlotTime) -> bool {
        self.slot_status(occupancy, start) == SlotStatus::Available
    }

    /// Every grid slot with its status, in ascending time order
    pub fn grid(&self, occupancy: &DayOccupancy<'_>) -> Vec<TimeOption> {
        HALF_HOUR_SLOTS
            .iter()
            .map(|&slot| TimeOption::new(slot, self.slot_status(occupancy, slot)))
            .collect()
    }

    /// Picker entries: occupied slots stay listed but disabled, elapsed and
    /// past-closing ones are dropped
    pub fn time_options(&self, occupancy: &DayOccupancy<'_>) -> Vec<TimeOption> {
        self.grid(occupancy)
            .into_iter()
            .filter(|o| !o.status.is_hidden())
            .collect()
    }

    pub fn list_available_slots(&self, occupancy: &DayOccupancy<'_>) -> Vec<SlotTime> {
        HALF_HOUR_SLOTS
            .iter()
            .copied()
            .filter(|&slot| self.is_slot_available(occupancy, slot))
            .collect()
    }
}

//! Scheduling core: time grid, notes codec, occupancy and availability

pub mod availability;
pub mod notes;
pub mod occupancy;
pub mod time;

pub use availability::{AvailabilityQuery, SlotStatus, TimeOption};
pub use occupancy::{DayOccupancy, OccupiedSlot};
pub use time::SlotTime;

//! Half-hour slot grid and `HH:MM` arithmetic

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::error::{AppError, AppResult};

/// Minutes in a day; all arithmetic wraps around it
pub const MINUTES_PER_DAY: i64 = 1440;

/// Granularity of the scheduling grid
pub const SLOT_MINUTES: u32 = 30;

pub const FIRST_ANCHOR_HOUR: u16 = 8;
pub const LAST_ANCHOR_HOUR: u16 = 22;

const ANCHOR_COUNT: usize = (LAST_ANCHOR_HOUR - FIRST_ANCHOR_HOUR + 1) as usize;
const GRID_LEN: usize = ANCHOR_COUNT * 2;

/// Hourly anchors 08:00 ..= 22:00, used to group the grid by hour
pub const HOURLY_ANCHORS: [SlotTime; ANCHOR_COUNT] = build_anchors();

/// Canonical half-hour grid 08:00 ..= 22:30
pub const HALF_HOUR_SLOTS: [SlotTime; GRID_LEN] = build_grid();

/// End of the day grid (23:00): last slot start plus one slot
pub const DAY_END_MINUTES: u32 = HALF_HOUR_SLOTS[GRID_LEN - 1].0 as u32 + SLOT_MINUTES;

const fn build_anchors() -> [SlotTime; ANCHOR_COUNT] {
    let mut out = [SlotTime(0); ANCHOR_COUNT];
    let mut i = 0;
    while i < ANCHOR_COUNT {
        out[i] = SlotTime((FIRST_ANCHOR_HOUR + i as u16) * 60);
        i += 1;
    }
    out
}

const fn build_grid() -> [SlotTime; GRID_LEN] {
    let anchors = build_anchors();
    let mut out = [SlotTime(0); GRID_LEN];
    let mut i = 0;
    while i < ANCHOR_COUNT {
        out[2 * i] = anchors[i];
        out[2 * i + 1] = SlotTime(anchors[i].0 + SLOT_MINUTES as u16);
        i += 1;
    }
    out
}

/// A wall-clock time of day with minute precision.
///
/// Stored as minutes since midnight, always in `0..1440`. Serialized as
/// `HH:MM`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct SlotTime(u16);

impl SlotTime {
    /// Build from a minute count, normalized modulo 1440 (never negative)
    pub fn from_minutes(minutes: i64) -> Self {
        SlotTime(minutes.rem_euclid(MINUTES_PER_DAY) as u16)
    }

    pub fn from_hm(hour: u32, minute: u32) -> AppResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(AppError::Format(format!(
                "Invalid time {:02}:{:02}",
                hour, minute
            )));
        }
        Ok(SlotTime((hour * 60 + minute) as u16))
    }

    /// Time of day of a local timestamp (seconds dropped)
    pub fn of(at: NaiveDateTime) -> Self {
        SlotTime((at.hour() * 60 + at.minute()) as u16)
    }

    pub fn minutes(self) -> u32 {
        self.0 as u32
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn add_minutes(self, delta: i64) -> Self {
        SlotTime::from_minutes(self.0 as i64 + delta)
    }

    /// Start of the half-hour bucket containing this time
    pub fn floor_to_slot(self) -> Self {
        SlotTime(self.0 - self.0 % SLOT_MINUTES as u16)
    }

    /// `"HH:MM a HH:MM"`, the half-hour starting here
    pub fn range_label(self) -> String {
        format!("{} a {}", self, self.add_minutes(SLOT_MINUTES as i64))
    }

    pub fn to_naive_time(self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(self.hour(), self.minutes() % 60, 0)
            .unwrap_or(chrono::NaiveTime::MIN)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for SlotTime {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::Format(format!("Invalid time '{}' (use HH:MM)", s));
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        SlotTime::from_hm(hour, minute).map_err(|_| invalid())
    }
}

/// Minutes since midnight of an `HH:MM` string
pub fn to_minutes(hhmm: &str) -> AppResult<u32> {
    Ok(hhmm.parse::<SlotTime>()?.minutes())
}

/// `HH:MM` of a minute count, wrapping around midnight
pub fn to_hhmm(minutes: i64) -> String {
    SlotTime::from_minutes(minutes).to_string()
}

pub fn add_minutes(hhmm: &str, delta: i64) -> AppResult<String> {
    Ok(hhmm.parse::<SlotTime>()?.add_minutes(delta).to_string())
}

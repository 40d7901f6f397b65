//! Read-only views of the panel: month calendar and day agenda

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Court, PaymentStatus, Reservation};
use crate::scheduling::time::SlotTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    /// e.g. `"Agosto 2026"`
    pub label: String,
    /// Active reservations today
    pub today_count: usize,
    /// Week rows flattened, Sunday first; leading `empty` cells pad day 1
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CalendarCell {
    Empty,
    #[serde(rename_all = "camelCase")]
    Day {
        day: u32,
        date: NaiveDate,
        /// Active reservations that day
        booked: usize,
        /// Up to three distinct court ids, first-seen order
        court_dots: Vec<i64>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayMetrics {
    pub booked: usize,
    #[schema(value_type = f64)]
    pub paid_total: Decimal,
    #[schema(value_type = f64)]
    pub outstanding: Decimal,
    /// Pending plus partially paid
    pub pending: usize,
    pub cancelled: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub metrics: DayMetrics,
    pub courts: Vec<CourtAgenda>,
    /// Active, not fully paid, by start time
    pub to_collect: Vec<Reservation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourtAgenda {
    pub court_id: i64,
    pub court_name: String,
    pub slots: Vec<AgendaSlot>,
}

impl CourtAgenda {
    pub fn for_court(court: &Court, slots: Vec<AgendaSlot>) -> Self {
        Self {
            court_id: court.id,
            court_name: court.name.clone(),
            slots,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgendaSlot {
    #[schema(value_type = String, example = "18:00")]
    pub slot: SlotTime,
    pub label: String,
    pub cell: AgendaCell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AgendaCell {
    Free,
    #[serde(rename_all = "camelCase")]
    Booked {
        reservation_id: i64,
        /// First half-hour of the reservation on this day
        is_start: bool,
        status: PaymentStatus,
        /// Display text for `status`
        status_label: String,
        client_name: String,
    },
}

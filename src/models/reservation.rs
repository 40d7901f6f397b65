//! Reservation model and payment lifecycle

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use crate::scheduling::{notes::ClientNotes, time::SlotTime};

// ---------------------------------------------------------------------------
// PaymentStatus
// ---------------------------------------------------------------------------

/// Payment state of a reservation.
///
/// `Cancelled` is terminal and removes the reservation from occupancy.
/// The legacy Spanish wire values are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[serde(alias = "pendiente")]
    Pending,
    #[serde(alias = "parcial")]
    Partial,
    #[serde(alias = "pagada")]
    Paid,
    #[serde(alias = "cancelada")]
    Cancelled,
}

impl PaymentStatus {
    /// Anything not cancelled occupies the grid
    pub fn is_active(self) -> bool {
        match self {
            PaymentStatus::Pending | PaymentStatus::Partial | PaymentStatus::Paid => true,
            PaymentStatus::Cancelled => false,
        }
    }

    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        match (self, next) {
            (Pending, Partial | Paid | Cancelled) => true,
            (Partial, Paid | Cancelled) => true,
            (Paid, Cancelled) => true,
            (Pending, Pending) | (Partial, Pending | Partial) => false,
            (Paid, Pending | Partial | Paid) => false,
            (Cancelled, _) => false,
        }
    }

    /// Status implied by the amounts, as the store derives it
    pub fn from_amounts(total: Decimal, paid: Decimal) -> Self {
        if total <= Decimal::ZERO || paid <= Decimal::ZERO {
            PaymentStatus::Pending
        } else if paid < total {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Paid
        }
    }

    /// Label shown on status badges
    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pendiente",
            PaymentStatus::Partial => "Parcial",
            PaymentStatus::Paid => "Pagada",
            PaymentStatus::Cancelled => "Cancelada",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Reservation
// ---------------------------------------------------------------------------

/// A booking of one court, as returned by the store.
///
/// Timestamps are local wall-clock time without offset.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    #[serde(alias = "cancha_id", alias = "court_id")]
    pub court_id: i64,
    #[serde(default, alias = "cancha_nombre")]
    pub court_name: Option<String>,
    #[serde(alias = "start_at")]
    pub start_at: NaiveDateTime,
    #[serde(alias = "end_at")]
    pub end_at: NaiveDateTime,
    #[serde(alias = "total_amount")]
    pub total_amount: Decimal,
    #[serde(default, alias = "paid_amount")]
    pub paid_amount: Decimal,
    #[serde(default, alias = "payment_method")]
    pub payment_method: Option<String>,
    #[serde(alias = "payment_status", alias = "estado")]
    pub payment_status: PaymentStatus,
    #[serde(default, alias = "notas")]
    pub notes: Option<String>,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.payment_status.is_active()
    }

    /// Calendar day the reservation is filed under
    pub fn date(&self) -> NaiveDate {
        self.start_at.date()
    }

    pub fn start_slot(&self) -> SlotTime {
        SlotTime::of(self.start_at)
    }

    pub fn end_slot(&self) -> SlotTime {
        SlotTime::of(self.end_at)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_at - self.start_at).num_minutes()
    }

    /// Amount still owed, never negative
    pub fn outstanding(&self) -> Decimal {
        (self.total_amount - self.paid_amount).max(Decimal::ZERO)
    }

    pub fn client_notes(&self) -> ClientNotes {
        crate::scheduling::notes::decode(self.notes.as_deref())
    }
}

/// Body of create and update requests sent to the store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPayload {
    pub court_id: i64,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub paid_amount: Decimal,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

/// Body of the mark-paid request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub mark_paid_full: bool,
}

//! Data models for the Canchas panel

pub mod agenda;
pub mod booking;
pub mod court;
pub mod reservation;

// Re-export commonly used types
pub use booking::{BookingDraft, DraftField, DurationOption};
pub use court::Court;
pub use reservation::{PaymentStatus, Reservation, ReservationPayload};

//! Business logic services

pub mod agenda;
pub mod bookings;
pub mod cache;
pub mod sessions;

pub use bookings::BookingService;
pub use cache::ReservationCache;
pub use sessions::{SessionRegistry, SharedSession};

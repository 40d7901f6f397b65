//! Canchas owner panel
//!
//! Scheduling engine for sports-court reservations: half-hour slot grid,
//! occupancy and availability, a per-session reservation cache and the
//! booking lifecycle against an external reservation store, served as a
//! small JSON panel API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<services::SessionRegistry>,
}

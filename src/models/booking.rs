//! Booking draft (create/edit form state)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    error::{AppError, AppResult},
    models::reservation::Reservation,
    scheduling::{
        availability::TimeOption,
        notes,
        time::{SlotTime, SLOT_MINUTES},
    },
};

/// Durations offered by the booking form, in minutes
pub const DURATION_OPTIONS: [u32; 4] = [30, 60, 90, 120];

/// Human label for a booking duration
pub fn duration_label(minutes: u32) -> String {
    match minutes {
        30 => "30 min".to_string(),
        60 => "1 h".to_string(),
        90 => "1 h 30 min".to_string(),
        120 => "2 h".to_string(),
        other => format!("{} min", other),
    }
}

/// Reject durations the booking form does not offer
pub fn check_duration(minutes: u32) -> AppResult<()> {
    if DURATION_OPTIONS.contains(&minutes) {
        Ok(())
    } else {
        Err(AppError::validation(
            DraftField::Duration,
            format!("Unsupported duration {} min", minutes),
        ))
    }
}

/// Entry of the duration picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DurationOption {
    pub minutes: u32,
    /// `"1 h 30 min"`
    pub label: String,
    /// Preselected for new bookings
    pub is_default: bool,
}

impl DurationOption {
    /// Every offered duration, in ascending order
    pub fn all(default_minutes: u32) -> Vec<Self> {
        DURATION_OPTIONS
            .iter()
            .map(|&minutes| Self {
                minutes,
                label: duration_label(minutes),
                is_default: minutes == default_minutes,
            })
            .collect()
    }
}

/// Draft field named by a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Court,
    Date,
    Start,
    Duration,
    ClientName,
    ClientPhone,
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DraftField::Court => "court",
            DraftField::Date => "date",
            DraftField::Start => "start",
            DraftField::Duration => "duration",
            DraftField::ClientName => "clientName",
            DraftField::ClientPhone => "clientPhone",
        };
        write!(f, "{}", name)
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Transient create/edit form state. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub court_id: Option<i64>,
    pub date: Option<NaiveDate>,
    /// Start slot (HH:MM)
    #[schema(value_type = Option<String>, example = "14:00")]
    pub start: Option<SlotTime>,
    pub duration_minutes: u32,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Client name is required"))]
    pub client_name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Client phone is required"))]
    pub client_phone: String,
    #[serde(default)]
    pub note: String,
}

/// Fields of a draft that passed the slot preconditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSelection {
    pub court_id: i64,
    pub date: NaiveDate,
    pub start: SlotTime,
    pub duration_minutes: u32,
}

impl BookingDraft {
    /// Prefill a draft from an existing reservation.
    ///
    /// Durations that are not one of [`DURATION_OPTIONS`] fall back to
    /// `default_duration`.
    pub fn from_reservation(reservation: &Reservation, default_duration: u32) -> Self {
        let decoded = reservation.client_notes();
        let minutes = reservation.duration_minutes().max(SLOT_MINUTES as i64);
        let duration_minutes = u32::try_from(minutes)
            .ok()
            .filter(|m| DURATION_OPTIONS.contains(m))
            .unwrap_or(default_duration);

        Self {
            court_id: Some(reservation.court_id),
            date: Some(reservation.date()),
            start: Some(reservation.start_slot()),
            duration_minutes,
            client_name: decoded.client_name,
            client_phone: decoded.client_phone,
            note: decoded.note,
        }
    }

    pub fn end(&self) -> Option<SlotTime> {
        self.start
            .map(|start| start.add_minutes(self.duration_minutes as i64))
    }

    pub fn encoded_notes(&self) -> Option<String> {
        notes::encode(&self.client_name, &self.client_phone, &self.note)
    }

    /// Court, date, start and duration must be present
    pub fn slot_selection(&self) -> AppResult<SlotSelection> {
        let court_id = self
            .court_id
            .ok_or_else(|| AppError::validation(DraftField::Court, "Select a court"))?;
        let date = self
            .date
            .ok_or_else(|| AppError::validation(DraftField::Date, "Select a date"))?;
        let start = self
            .start
            .ok_or_else(|| AppError::validation(DraftField::Start, "Select a start time"))?;
        check_duration(self.duration_minutes)?;
        Ok(SlotSelection {
            court_id,
            date,
            start,
            duration_minutes: self.duration_minutes,
        })
    }

    /// Client name and phone must be non-blank
    pub fn check_client(&self) -> AppResult<()> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };
        let fields = errors.field_errors();
        for (key, field) in [
            ("client_name", DraftField::ClientName),
            ("client_phone", DraftField::ClientPhone),
        ] {
            if let Some(error) = fields.get(key).and_then(|errs| errs.first()) {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is required", field));
                return Err(AppError::validation(field, message));
            }
        }
        Ok(())
    }

    /// Re-pick the start slot after a draft change.
    ///
    /// When the current start is missing from `options` or disabled, moves
    /// to the first enabled option. Returns whether the start changed.
    pub fn repair_start(&mut self, options: &[TimeOption]) -> bool {
        let current_ok = self.start.is_some_and(|start| {
            options
                .iter()
                .any(|o| o.slot == start && !o.status.is_disabled())
        });
        if current_ok {
            return false;
        }
        match options.iter().find(|o| !o.status.is_disabled()) {
            Some(first_free) => {
                let changed = self.start != Some(first_free.slot);
                self.start = Some(first_free.slot);
                changed
            }
            None => false,
        }
    }
}

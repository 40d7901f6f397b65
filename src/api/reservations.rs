//! Reservation lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{BookingDraft, DraftField, DurationOption, Reservation},
    scheduling::availability::TimeOption,
    AppState,
};

use super::{local_now, PanelSession};

/// Create a reservation from a draft
#[utoipa::path(
    post,
    path = "/panel/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = BookingDraft,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 400, description = "Draft incomplete", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot not available", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_reservation(
    PanelSession(session): PanelSession,
    Json(draft): Json<BookingDraft>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let mut service = session.lock().await;
    let created = service.create(&draft, local_now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Edit a reservation.
///
/// When the store refuses the in-place update, the reservation is cancelled
/// and recreated; the response then carries the new id.
#[utoipa::path(
    put,
    path = "/panel/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Reservation ID")),
    request_body = BookingDraft,
    responses(
        (status = 200, description = "Reservation updated or replaced", body = Reservation),
        (status = 404, description = "Reservation not loaded in this session", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot not available", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_reservation(
    PanelSession(session): PanelSession,
    Path(id): Path<i64>,
    Json(draft): Json<BookingDraft>,
) -> AppResult<Json<Reservation>> {
    let mut service = session.lock().await;
    let existing = service.reservation(id)?;
    let updated = service.edit(&existing, &draft, local_now()).await?;
    Ok(Json(updated))
}

/// Cancel a reservation
#[utoipa::path(
    put,
    path = "/panel/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 204, description = "Reservation cancelled"),
        (status = 422, description = "Already cancelled", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_reservation(
    PanelSession(session): PanelSession,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut service = session.lock().await;
    let existing = service.reservation(id)?;
    service.cancel(&existing).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a reservation as fully paid
#[utoipa::path(
    put,
    path = "/panel/reservations/{id}/payment",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation paid", body = Reservation),
        (status = 422, description = "Already paid or cancelled", body = crate::error::ErrorResponse)
    )
)]
pub async fn pay_reservation(
    PanelSession(session): PanelSession,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let mut service = session.lock().await;
    let existing = service.reservation(id)?;
    let paid = service.mark_paid(&existing).await?;
    Ok(Json(paid))
}

/// Edit form prefilled from a reservation
#[utoipa::path(
    get,
    path = "/panel/reservations/{id}/draft",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Prefilled draft", body = BookingDraft),
        (status = 404, description = "Reservation not loaded in this session", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_draft(
    PanelSession(session): PanelSession,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingDraft>> {
    let service = session.lock().await;
    let existing = service.reservation(id)?;
    Ok(Json(BookingDraft::from_reservation(
        &existing,
        service.default_duration(),
    )))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftCheckRequest {
    pub draft: BookingDraft,
    /// Reservation being edited, if any
    pub excluding: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftCheckResponse {
    /// The draft, with its start moved to the first free slot if needed
    pub draft: BookingDraft,
    /// Whether the start was moved
    pub start_changed: bool,
    pub options: Vec<TimeOption>,
}

/// Recompute options for a draft after its court, date or duration changed
#[utoipa::path(
    post,
    path = "/panel/drafts/check",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = DraftCheckRequest,
    responses(
        (status = 200, description = "Options and repaired draft", body = DraftCheckResponse),
        (status = 400, description = "Court or date missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_draft(
    PanelSession(session): PanelSession,
    Json(request): Json<DraftCheckRequest>,
) -> AppResult<Json<DraftCheckResponse>> {
    let DraftCheckRequest { mut draft, excluding } = request;
    let (court_id, date) = match (draft.court_id, draft.date) {
        (Some(court_id), Some(date)) => (court_id, date),
        (None, _) => {
            return Err(AppError::validation(DraftField::Court, "Select a court"))
        }
        (_, None) => {
            return Err(AppError::validation(DraftField::Date, "Select a date"))
        }
    };

    let mut service = session.lock().await;
    let options = service
        .time_options(court_id, date, draft.duration_minutes, local_now(), excluding)
        .await?;
    let start_changed = draft.repair_start(&options);

    Ok(Json(DraftCheckResponse {
        draft,
        start_changed,
        options,
    }))
}

/// Durations offered by the booking form, with the configured default marked
#[utoipa::path(
    get,
    path = "/panel/durations",
    tag = "reservations",
    responses(
        (status = 200, description = "Duration picker entries", body = Vec<DurationOption>)
    )
)]
pub async fn list_durations(State(state): State<AppState>) -> Json<Vec<DurationOption>> {
    Json(DurationOption::all(
        state.config.booking.default_duration_minutes,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::{AppConfig, StoreConfig},
        repository::HttpStore,
        services::SessionRegistry,
    };

    #[tokio::test]
    async fn test_durations_follow_configured_default() {
        let mut config = AppConfig::default();
        config.booking.default_duration_minutes = 90;
        let store = HttpStore::new(&StoreConfig::default()).unwrap();
        let state = AppState {
            config: Arc::new(config),
            sessions: Arc::new(SessionRegistry::new(store, 90)),
        };

        let Json(options) = list_durations(State(state)).await;

        let minutes: Vec<u32> = options.iter().map(|o| o.minutes).collect();
        assert_eq!(minutes, vec![30, 60, 90, 120]);
        let default: Vec<&str> = options
            .iter()
            .filter(|o| o.is_default)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(default, vec!["1 h 30 min"]);
    }
}

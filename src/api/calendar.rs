//! Month calendar, day agenda and start-time options

use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::agenda::{DayAgenda, MonthCalendar},
    scheduling::availability::TimeOption,
    services::{agenda, cache::month_bounds},
};

use super::{local_now, parse_date, PanelSession};

/// Month view; reloads the whole month from the store
#[utoipa::path(
    get,
    path = "/panel/calendar/{year}/{month}",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month, 1-12")
    ),
    responses(
        (status = 200, description = "Month calendar", body = MonthCalendar),
        (status = 502, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_month(
    PanelSession(session): PanelSession,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Json<MonthCalendar>> {
    let (first, last) = month_bounds(year, month)?;
    let today = local_now().date();

    let mut service = session.lock().await;
    service.cache_mut().load_month(year, month).await?;
    let today_count = agenda::active_count(service.cache_mut().ensure_day_safe(today).await);

    let days = service.cache().range(first, last);
    let calendar = agenda::month_calendar(year, month, &days, today_count)?;
    Ok(Json(calendar))
}

/// Day view: per-court grid, metrics and amounts to collect
#[utoipa::path(
    get,
    path = "/panel/days/{date}",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "Day, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Day agenda", body = DayAgenda),
        (status = 400, description = "Malformed date", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_day(
    PanelSession(session): PanelSession,
    Path(date): Path<String>,
) -> AppResult<Json<DayAgenda>> {
    let date = parse_date(&date)?;

    let mut service = session.lock().await;
    service.courts().await?;
    let reservations = service.cache_mut().ensure_day_safe(date).await.to_vec();

    Ok(Json(agenda::day_agenda(date, service.active_courts(), &reservations)))
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotsQuery {
    pub court_id: i64,
    /// Minutes; defaults to the configured booking duration
    pub duration: Option<u32>,
    /// Reservation being edited
    pub excluding: Option<i64>,
}

/// Start-time options for a court and day
#[utoipa::path(
    get,
    path = "/panel/days/{date}/slots",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(
        ("date" = String, Path, description = "Day, YYYY-MM-DD"),
        SlotsQuery
    ),
    responses(
        (status = 200, description = "Selectable start times", body = Vec<TimeOption>)
    )
)]
pub async fn get_slots(
    PanelSession(session): PanelSession,
    Path(date): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<Json<Vec<TimeOption>>> {
    let date = parse_date(&date)?;

    let mut service = session.lock().await;
    let duration = query.duration.unwrap_or(service.default_duration());
    let options = service
        .time_options(query.court_id, date, duration, local_now(), query.excluding)
        .await?;
    Ok(Json(options))
}

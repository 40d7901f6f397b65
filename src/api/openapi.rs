//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{calendar, courts, health, reservations};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Canchas Panel API",
        version = "1.0.0",
        description = "Owner panel for court reservations: calendar, availability and booking lifecycle",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Courts
        courts::list_courts,
        // Calendar
        calendar::get_month,
        calendar::get_day,
        calendar::get_slots,
        // Reservations
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        reservations::pay_reservation,
        reservations::get_draft,
        reservations::check_draft,
        reservations::list_durations,
    ),
    components(
        schemas(
            // Courts
            crate::models::Court,
            courts::CourtsQuery,
            // Calendar
            crate::models::agenda::MonthCalendar,
            crate::models::agenda::CalendarCell,
            crate::models::agenda::DayAgenda,
            crate::models::agenda::DayMetrics,
            crate::models::agenda::CourtAgenda,
            crate::models::agenda::AgendaSlot,
            crate::models::agenda::AgendaCell,
            crate::scheduling::availability::TimeOption,
            crate::scheduling::availability::SlotStatus,
            calendar::SlotsQuery,
            // Reservations
            crate::models::Reservation,
            crate::models::PaymentStatus,
            crate::models::BookingDraft,
            crate::models::DraftField,
            crate::models::DurationOption,
            crate::scheduling::notes::ClientNotes,
            reservations::DraftCheckRequest,
            reservations::DraftCheckResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "courts", description = "Owner courts"),
        (name = "calendar", description = "Month, day and slot views"),
        (name = "reservations", description = "Reservation lifecycle")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

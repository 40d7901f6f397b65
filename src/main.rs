//! Canchas Panel Server
//!
//! Serves the owner panel API in front of the reservation store.

use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canchas_panel::{
    api,
    config::AppConfig,
    repository::HttpStore,
    services::SessionRegistry,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("canchas_panel={},tower_http=debug", config.logging.level).into());

    let json = config.logging.format.eq_ignore_ascii_case("json");
    tracing_subscriber::registry()
        .with(filter)
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .init();

    tracing::info!("Starting Canchas Panel v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Reservation store at {}", config.store.url("/"));

    // Store client shared by every session
    let store = HttpStore::new(&config.store).context("Failed to create store client")?;
    let sessions = SessionRegistry::new(store, config.booking.default_duration_minutes);

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        sessions: Arc::new(sessions),
    };

    // Build router
    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Courts
        .route("/panel/courts", get(api::courts::list_courts))
        // Calendar
        .route("/panel/calendar/:year/:month", get(api::calendar::get_month))
        .route("/panel/days/:date", get(api::calendar::get_day))
        .route("/panel/days/:date/slots", get(api::calendar::get_slots))
        // Reservations
        .route("/panel/reservations", post(api::reservations::create_reservation))
        .route("/panel/reservations/:id", put(api::reservations::update_reservation))
        .route("/panel/reservations/:id/cancel", put(api::reservations::cancel_reservation))
        .route("/panel/reservations/:id/payment", put(api::reservations::pay_reservation))
        .route("/panel/reservations/:id/draft", get(api::reservations::get_draft))
        .route("/panel/drafts/check", post(api::reservations::check_draft))
        .route("/panel/durations", get(api::reservations::list_durations))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}

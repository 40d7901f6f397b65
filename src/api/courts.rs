//! Court listing

use axum::{extract::Query, Json};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppResult, models::Court};

use super::PanelSession;

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CourtsQuery {
    /// Fetch the courts from the store again
    #[serde(default)]
    pub refresh: bool,
}

/// Courts of the owner, active or not
#[utoipa::path(
    get,
    path = "/panel/courts",
    tag = "courts",
    security(("bearer_auth" = [])),
    params(CourtsQuery),
    responses(
        (status = 200, description = "Owner courts", body = Vec<Court>),
        (status = 401, description = "Missing or rejected token", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_courts(
    PanelSession(session): PanelSession,
    Query(query): Query<CourtsQuery>,
) -> AppResult<Json<Vec<Court>>> {
    let mut service = session.lock().await;
    let courts = if query.refresh {
        service.load_courts().await?
    } else {
        service.courts().await?
    };
    Ok(Json(courts.to_vec()))
}

//! API handlers for the Canchas panel endpoints

pub mod calendar;
pub mod courts;
pub mod health;
pub mod openapi;
pub mod reservations;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{NaiveDate, NaiveDateTime};

use crate::{error::AppError, services::SharedSession, AppState};

/// Panel session of the owner whose bearer token came with the request.
///
/// A token seen for the first time opens a session only if the store
/// accepts it.
pub struct PanelSession(pub SharedSession);

#[async_trait]
impl FromRequestParts<AppState> for PanelSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        let token = bearer.token().trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized("Empty bearer token".to_string()));
        }

        Ok(PanelSession(state.sessions.session(token).await?))
    }
}

/// `YYYY-MM-DD` path segment
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Format(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Wall-clock time of the panel host
pub(crate) fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

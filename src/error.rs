//! Error types for the Canchas panel

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::{booking::DraftField, reservation::PaymentStatus};

/// Stable error codes exposed to panel clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    InvalidField = 3,
    SlotUnavailable = 4,
    StoreFailure = 5,
    NoSuchData = 6,
    BadValue = 7,
    InvalidTransition = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A booking precondition is not met; blocks submission
    #[error("Validation error on {field}: {message}")]
    Validation { field: DraftField, message: String },

    /// The requested slot is not available
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The external store is unreachable or answered non-2xx
    #[error("Store error: {0}")]
    Network(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A single day failed to load and was replaced by an empty entry
    #[error("Degraded load for {date}: {reason}")]
    DegradedLoad { date: NaiveDate, reason: String },

    #[error("Cannot move reservation from {from} to {to}")]
    InvalidTransition { from: PaymentStatus, to: PaymentStatus },

    /// Malformed external input (`HH:MM`, dates)
    #[error("Format error: {0}")]
    Format(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: DraftField, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            return AppError::Unauthorized(e.to_string());
        }
        AppError::Network(e.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Offending draft field for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<DraftField>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut field = None;
        let (status, code, message) = match &self {
            AppError::Validation { field: f, message } => {
                field = Some(*f);
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidField, message.clone())
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::SlotUnavailable, msg.clone())
            }
            AppError::Network(msg) => {
                tracing::error!("Store error: {}", msg);
                (StatusCode::BAD_GATEWAY, ErrorCode::StoreFailure, msg.clone())
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::DegradedLoad { .. } => {
                (StatusCode::BAD_GATEWAY, ErrorCode::StoreFailure, self.to_string())
            }
            AppError::InvalidTransition { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::InvalidTransition,
                self.to_string(),
            ),
            AppError::Format(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            field,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

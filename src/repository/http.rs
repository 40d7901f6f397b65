//! HTTP client for the reservation store

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ReservationStore;
use crate::{
    config::StoreConfig,
    error::{AppError, AppResult},
    models::{
        reservation::PaymentRequest, Court, Reservation, ReservationPayload,
    },
};

/// Store client bound to one bearer token.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct HttpStore {
    client: Client,
    config: StoreConfig,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            token: None,
        })
    }

    /// Same client, authenticated with `token`
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    fn request(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("No session token".to_string()))?;

        Ok(self
            .client
            .request(method, self.config.url(path))
            .bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> AppResult<()> {
        check(request.send().await?).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into an error carrying the store's message
async fn check(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.json::<Value>().await.ok();
    let message = body
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| format!("Error {}", status.as_u16()));

    tracing::debug!("Store answered {}: {}", status, message);

    if status == StatusCode::UNAUTHORIZED {
        Err(AppError::Unauthorized(message))
    } else {
        Err(AppError::Network(message))
    }
}

fn error_message(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::String(detail)) => Some(detail.clone()),
        Some(detail) if !detail.is_null() => Some(detail.to_string()),
        _ => body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[async_trait]
impl ReservationStore for HttpStore {
    async fn list_courts(&self) -> AppResult<Vec<Court>> {
        let request = self.request(Method::GET, "/courts")?;
        self.send(request).await
    }

    async fn list_day(&self, date: NaiveDate) -> AppResult<Vec<Reservation>> {
        let request = self
            .request(Method::GET, "/reservations")?
            .query(&[("date", date.to_string())]);
        self.send(request).await
    }

    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Reservation>> {
        let request = self
            .request(Method::GET, "/reservations/range")?
            .query(&[("from", from.to_string()), ("to", to.to_string())]);
        self.send(request).await
    }

    async fn create(&self, payload: &ReservationPayload) -> AppResult<Reservation> {
        let request = self.request(Method::POST, "/reservations")?.json(payload);
        self.send(request).await
    }

    async fn update(&self, id: i64, payload: &ReservationPayload) -> AppResult<Reservation> {
        let request = self
            .request(Method::PUT, &format!("/reservations/{}", id))?
            .json(payload);
        self.send(request).await
    }

    async fn cancel(&self, id: i64) -> AppResult<()> {
        let request = self.request(Method::PUT, &format!("/reservations/{}/cancel", id))?;
        self.send_empty(request).await
    }

    async fn mark_paid(&self, id: i64) -> AppResult<Reservation> {
        let request = self
            .request(Method::PUT, &format!("/reservations/{}/payment", id))?
            .json(&PaymentRequest {
                mark_paid_full: true,
            });
        self.send(request).await
    }
}

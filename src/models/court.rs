//! Court (cancha) model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single bookable field owned by a complex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: i64,
    #[serde(alias = "nombre")]
    pub name: String,
    /// Price per hour, in the complex currency
    #[serde(alias = "precio_hora", alias = "hourly_price")]
    pub hourly_price: Decimal,
    #[serde(alias = "is_active")]
    pub is_active: bool,
    #[serde(default, alias = "complejo_id", alias = "complex_id")]
    pub complex_id: Option<i64>,
}

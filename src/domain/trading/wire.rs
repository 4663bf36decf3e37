//! Wire types for trading endpoints.

use crate::shared::serde_util::lenient_datetime;
use crate::shared::{Category, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: Decimal,
}

/// One stored purchase, as returned by `GET /api/trading/positions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub symbol: String,
    pub category: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub total_cost: Decimal,
    #[serde(default)]
    pub fees: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_datetime::deserialize")]
    pub purchase_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsResponse {
    #[serde(default)]
    pub positions: Vec<PositionRecord>,
    #[serde(default)]
    pub balance: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyRequest {
    pub symbol: Symbol,
    pub category: Category,
    pub quantity: u32,
    /// Sent as a JSON number; the trading service parses a double.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyResponse {
    #[serde(default)]
    pub success: bool,
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fees: Decimal,
    pub total_cost: Decimal,
    pub remaining_balance: Decimal,
}

/// Body of a 4xx answer to a purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionBody {
    pub error: String,
    #[serde(default)]
    pub required: Option<Decimal>,
    #[serde(default)]
    pub available: Option<Decimal>,
    #[serde(default)]
    pub fees: Option<Decimal>,
}

//! Wire types for market data (SSE ticks + REST candles).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One `data:` payload from the price channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickPayload {
    pub symbol: String,
    pub price: Decimal,
    #[serde(default)]
    pub change: Option<Decimal>,
    #[serde(default)]
    pub change_percent: Option<Decimal>,
}

/// REST response for historical daily candles.
///
/// Paired arrays: `t[i]` (Unix seconds) belongs to `c[i]` (close). Both are
/// absent when the upstream provider failed; `s` is `"ok"` on success.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandleResponse {
    #[serde(rename = "s", default)]
    pub status: Option<String>,
    #[serde(rename = "t", default)]
    pub times: Option<Vec<i64>>,
    #[serde(rename = "c", default)]
    pub closes: Option<Vec<Decimal>>,
}

impl CandleResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}

//! Market domain: price ticks, category snapshots, historical candles.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::Symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::CategorySnapshot;

// ─── PriceTick ───────────────────────────────────────────────────────────────

/// One price update for a symbol, as pushed by the market feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub symbol: Symbol,
    pub price: Decimal,
    /// Absolute change since the previous close.
    pub change: Decimal,
    /// Relative change since the previous close, in percent.
    pub change_percent: Decimal,
}

impl PriceTick {
    /// Direction of the day's move; unchanged counts as positive.
    pub fn trend(&self) -> Trend {
        Trend::between(Decimal::ZERO, self.change)
    }
}

// ─── Trend ───────────────────────────────────────────────────────────────────

/// Up/down classification used for price and chart colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
}

impl Trend {
    /// `Positive` when `last >= first`.
    pub fn between(first: Decimal, last: Decimal) -> Self {
        if last >= first {
            Trend::Positive
        } else {
            Trend::Negative
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Trend::Positive)
    }
}

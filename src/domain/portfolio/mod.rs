//! Portfolio domain: grouped positions and live valuation.
//!
//! Purchase records are grouped per symbol ([`aggregate::group`]) and then
//! valued against the latest known quotes ([`valuation::value`]). Both steps
//! are pure; [`client::PortfolioClient`] wires them to the backend.

pub mod aggregate;
#[cfg(feature = "http")]
pub mod client;
pub mod valuation;

use crate::shared::{Category, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use aggregate::group;
pub use valuation::value;

// ─── GroupedPosition ─────────────────────────────────────────────────────────

/// All purchases of one symbol, summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedPosition {
    pub symbol: Symbol,
    pub category: Category,
    pub quantity: Decimal,
    pub total_cost: Decimal,
    pub fees: Decimal,
    /// Price of the first purchase encountered, not an average.
    pub purchase_price: Decimal,
    /// Number of purchase records merged into this position.
    pub records: usize,
}

impl GroupedPosition {
    /// Cost basis per unit, fees included.
    pub fn average_cost(&self) -> Decimal {
        if self.quantity.is_zero() {
            return Decimal::ZERO;
        }
        self.total_cost
            .checked_div(self.quantity)
            .unwrap_or(Decimal::ZERO)
    }
}

// ─── PortfolioItem ───────────────────────────────────────────────────────────

/// Where an item's `current_price` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Latest close from the market data service.
    Live,
    /// No quote was available; the purchase price stands in.
    PurchasePrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub position: GroupedPosition,
    pub current_price: Decimal,
    pub price_source: PriceSource,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
    /// Share of the portfolio's total value, in percent.
    pub percentage: Decimal,
}

impl PortfolioItem {
    pub fn symbol(&self) -> &Symbol {
        &self.position.symbol
    }
}

// ─── PortfolioSummary ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub items: Vec<PortfolioItem>,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_profit_loss: Decimal,
    pub total_profit_loss_percent: Decimal,
}

impl PortfolioSummary {
    /// `(symbol, current value)` pairs, in item order.
    pub fn allocation(&self) -> Vec<(Symbol, Decimal)> {
        self.items
            .iter()
            .map(|item| (item.symbol().clone(), item.current_value))
            .collect()
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&PortfolioItem> {
        self.items.iter().find(|item| item.symbol() == symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ─── PortfolioState ──────────────────────────────────────────────────────────

/// Published state of the most recent portfolio load.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PortfolioState {
    #[default]
    NotLoaded,
    Loading,
    Loaded(PortfolioSummary),
    /// The load failed; no stale summary is kept.
    Failed(String),
}

impl PortfolioState {
    pub fn summary(&self) -> Option<&PortfolioSummary> {
        match self {
            Self::Loaded(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// `part / whole * 100`, or zero when `whole` is zero or the ratio does not
/// fit in a `Decimal`.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_cost() {
        let position = GroupedPosition {
            symbol: Symbol::from("AAPL"),
            category: Category::Stocks,
            quantity: Decimal::from(5),
            total_cost: Decimal::from(530),
            fees: Decimal::from(4),
            purchase_price: Decimal::from(100),
            records: 2,
        };
        assert_eq!(position.average_cost(), Decimal::from(106));
        assert_eq!(position.purchase_price, Decimal::from(100));
    }

    #[test]
    fn test_percent_of_zero_guard() {
        assert_eq!(percent_of(Decimal::from(5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(Decimal::from(1), Decimal::from(4)), Decimal::from(25));
    }

    #[test]
    fn test_percent_of_overflow_is_zero() {
        let tiny = Decimal::new(1, 28);
        assert_eq!(percent_of(Decimal::MAX, tiny), Decimal::ZERO);
        assert_eq!(percent_of(Decimal::from(1_000_000), tiny), Decimal::ZERO);
    }

    #[test]
    fn test_average_cost_overflow_is_zero() {
        let position = GroupedPosition {
            symbol: Symbol::from("DUST"),
            category: Category::Bonds,
            quantity: Decimal::new(1, 28),
            total_cost: Decimal::MAX,
            fees: Decimal::ZERO,
            purchase_price: Decimal::ONE,
            records: 1,
        };
        assert_eq!(position.average_cost(), Decimal::ZERO);
    }

    #[test]
    fn test_state_summary() {
        assert!(PortfolioState::NotLoaded.summary().is_none());
        let loaded = PortfolioState::Loaded(PortfolioSummary::default());
        assert!(loaded.summary().unwrap().is_empty());
    }
}

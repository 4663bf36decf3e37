//! Trading domain: purchase records, orders, fees, balance.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod fees;
pub mod wire;

use crate::shared::{Category, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use fees::CostPreview;

// ─── PurchaseRecord ──────────────────────────────────────────────────────────

/// One executed purchase from the backend ledger. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: Option<i64>,
    pub symbol: Symbol,
    pub category: Category,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    /// Asset cost plus fees, as charged.
    pub total_cost: Decimal,
    pub fees: Decimal,
    pub purchase_date: Option<DateTime<Utc>>,
}

// ─── PurchaseOrder ───────────────────────────────────────────────────────────

/// A purchase the user intends to submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub symbol: Symbol,
    pub category: Category,
    pub quantity: u32,
    pub price: Decimal,
}

impl PurchaseOrder {
    pub fn new(symbol: impl Into<Symbol>, category: Category, quantity: u32, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            category,
            quantity,
            price,
        }
    }

    /// Local cost estimate. The server's committed figures always win.
    pub fn preview(&self) -> CostPreview {
        CostPreview::compute(self.category, self.price, Decimal::from(self.quantity))
    }

    /// Checks the same preconditions the trading service enforces.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.symbol.is_empty() {
            return Err(OrderValidationError::EmptySymbol);
        }
        if self.quantity == 0 {
            return Err(OrderValidationError::NonPositiveQuantity);
        }
        if self.price <= Decimal::ZERO {
            return Err(OrderValidationError::NonPositivePrice);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    #[error("Symbol must not be empty")]
    EmptySymbol,
    #[error("Quantity must be positive")]
    NonPositiveQuantity,
    #[error("Price must be positive")]
    NonPositivePrice,
}

// ─── BuyReceipt ──────────────────────────────────────────────────────────────

/// Server-committed result of a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyReceipt {
    pub symbol: Symbol,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fees: Decimal,
    pub total_cost: Decimal,
    pub remaining_balance: Decimal,
}

// ─── ValidationError ─────────────────────────────────────────────────────────

/// A purchase record from the backend that violates ledger invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Purchase record has an empty symbol")]
    EmptySymbol,
    #[error("Unknown category {0:?} for {1}")]
    UnknownCategory(String, Symbol),
    #[error("Non-positive quantity {0} for {1}")]
    NonPositiveQuantity(Decimal, Symbol),
    #[error("Negative {field} {value} for {symbol}")]
    Negative {
        field: &'static str,
        value: Decimal,
        symbol: Symbol,
    },
}

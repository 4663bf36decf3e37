//! Fee schedule and cost previews.
//!
//! Stocks and ETFs pay a flat 2.00 per purchase. Bonds pay 2.00 plus 0.5% of
//! the asset cost.

use crate::shared::Category;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat fee charged on every purchase.
pub const BASE_FEE: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Proportional bond fee (0.5%).
pub const BOND_FEE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

pub fn asset_cost(price: Decimal, quantity: Decimal) -> Decimal {
    price * quantity
}

pub fn fee(category: Category, price: Decimal, quantity: Decimal) -> Decimal {
    match category {
        Category::Bonds => BASE_FEE + asset_cost(price, quantity) * BOND_FEE_RATE,
        Category::Stocks | Category::Etfs => BASE_FEE,
    }
}

pub fn total_cost(category: Category, price: Decimal, quantity: Decimal) -> Decimal {
    asset_cost(price, quantity) + fee(category, price, quantity)
}

/// Breakdown shown before a purchase is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostPreview {
    pub asset_cost: Decimal,
    pub fees: Decimal,
    pub total_cost: Decimal,
}

impl CostPreview {
    pub fn compute(category: Category, price: Decimal, quantity: Decimal) -> Self {
        let asset_cost = asset_cost(price, quantity);
        let fees = fee(category, price, quantity);
        Self {
            asset_cost,
            fees,
            total_cost: asset_cost + fees,
        }
    }

    pub fn affordable(&self, balance: Decimal) -> bool {
        self.total_cost <= balance
    }
}

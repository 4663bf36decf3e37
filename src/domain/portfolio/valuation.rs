//! Portfolio valuation against live quotes.

use super::{percent_of, GroupedPosition, PortfolioItem, PortfolioSummary, PriceSource};
use crate::shared::Symbol;
use rust_decimal::Decimal;

/// Value grouped positions using `quote` for the current price of each symbol.
///
/// A symbol without a quote is valued at its purchase price.
pub fn value<F>(positions: &[GroupedPosition], quote: F) -> PortfolioSummary
where
    F: Fn(&Symbol) -> Option<Decimal>,
{
    let mut items: Vec<PortfolioItem> = positions
        .iter()
        .map(|position| {
            let (current_price, price_source) = match quote(&position.symbol) {
                Some(price) => (price, PriceSource::Live),
                None => {
                    tracing::warn!(
                        symbol = %position.symbol,
                        fallback = %position.purchase_price,
                        "No quote available, valuing at purchase price"
                    );
                    (position.purchase_price, PriceSource::PurchasePrice)
                }
            };
            let current_value = current_price.saturating_mul(position.quantity);
            let profit_loss = current_value.saturating_sub(position.total_cost);
            PortfolioItem {
                position: position.clone(),
                current_price,
                price_source,
                current_value,
                profit_loss,
                profit_loss_percent: percent_of(profit_loss, position.total_cost),
                percentage: Decimal::ZERO,
            }
        })
        .collect();

    let total_value = items
        .iter()
        .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.current_value));
    let total_cost = items
        .iter()
        .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.position.total_cost));
    let total_profit_loss = total_value.saturating_sub(total_cost);

    for item in &mut items {
        item.percentage = percent_of(item.current_value, total_value);
    }

    PortfolioSummary {
        items,
        total_value,
        total_cost,
        total_profit_loss,
        total_profit_loss_percent: percent_of(total_profit_loss, total_cost),
    }
}

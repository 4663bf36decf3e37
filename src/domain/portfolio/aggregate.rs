//! Grouping purchase records into per-symbol positions.

use super::GroupedPosition;
use crate::domain::trading::PurchaseRecord;
use crate::shared::Symbol;
use std::collections::HashMap;

/// Group purchase records by symbol, in order of first appearance.
///
/// Quantity, total cost and fees are summed. `purchase_price` and `category`
/// come from the first record seen for each symbol.
pub fn group(records: &[PurchaseRecord]) -> Vec<GroupedPosition> {
    let mut positions: Vec<GroupedPosition> = Vec::new();
    let mut index: HashMap<&Symbol, usize> = HashMap::new();

    for record in records {
        match index.get(&record.symbol) {
            Some(&idx) => {
                let position = &mut positions[idx];
                position.quantity = position.quantity.saturating_add(record.quantity);
                position.total_cost = position.total_cost.saturating_add(record.total_cost);
                position.fees = position.fees.saturating_add(record.fees);
                position.records += 1;
            }
            None => {
                index.insert(&record.symbol, positions.len());
                positions.push(GroupedPosition {
                    symbol: record.symbol.clone(),
                    category: record.category,
                    quantity: record.quantity,
                    total_cost: record.total_cost,
                    fees: record.fees,
                    purchase_price: record.purchase_price,
                    records: 1,
                });
            }
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Category;
    use rust_decimal::Decimal;

    fn record(symbol: &str, quantity: i64, total_cost: i64, price: i64) -> PurchaseRecord {
        PurchaseRecord {
            id: None,
            symbol: Symbol::from(symbol),
            category: Category::Stocks,
            quantity: Decimal::from(quantity),
            purchase_price: Decimal::from(price),
            total_cost: Decimal::from(total_cost),
            fees: Decimal::TWO,
            purchase_date: None,
        }
    }

    #[test]
    fn test_group_sums_and_keeps_first_price() {
        let grouped = group(&[record("AAPL", 2, 200, 100), record("AAPL", 3, 330, 110)]);
        assert_eq!(grouped.len(), 1);
        let aapl = &grouped[0];
        assert_eq!(aapl.quantity, Decimal::from(5));
        assert_eq!(aapl.total_cost, Decimal::from(530));
        assert_eq!(aapl.fees, Decimal::from(4));
        assert_eq!(aapl.purchase_price, Decimal::from(100));
        assert_eq!(aapl.records, 2);
    }

    #[test]
    fn test_group_first_appearance_order() {
        let grouped = group(&[
            record("MSFT", 1, 400, 400),
            record("AAPL", 1, 100, 100),
            record("MSFT", 1, 410, 410),
        ]);
        let order: Vec<&str> = grouped.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(order, ["MSFT", "AAPL"]);
    }

    #[test]
    fn test_group_empty() {
        assert!(group(&[]).is_empty());
    }
}

//! Conversions: trading wire types → domain types.

use super::wire::{BuyResponse, PositionRecord};
use super::{BuyReceipt, PurchaseRecord, ValidationError};
use crate::shared::{Category, Symbol};
use rust_decimal::Decimal;

impl TryFrom<PositionRecord> for PurchaseRecord {
    type Error = ValidationError;

    fn try_from(record: PositionRecord) -> Result<Self, Self::Error> {
        let symbol = Symbol::from(record.symbol.trim());
        if symbol.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let category: Category = record
            .category
            .parse()
            .map_err(|_| ValidationError::UnknownCategory(record.category.clone(), symbol.clone()))?;

        if record.quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity(record.quantity, symbol));
        }

        let fees = record.fees.unwrap_or(Decimal::ZERO);
        for (field, value) in [
            ("purchase price", record.purchase_price),
            ("total cost", record.total_cost),
            ("fees", fees),
        ] {
            if value < Decimal::ZERO {
                return Err(ValidationError::Negative {
                    field,
                    value,
                    symbol,
                });
            }
        }

        Ok(PurchaseRecord {
            id: record.id,
            symbol,
            category,
            quantity: record.quantity,
            purchase_price: record.purchase_price,
            total_cost: record.total_cost,
            fees,
            purchase_date: record.purchase_date,
        })
    }
}

impl From<BuyResponse> for BuyReceipt {
    fn from(resp: BuyResponse) -> Self {
        BuyReceipt {
            symbol: Symbol::from(resp.symbol),
            quantity: resp.quantity,
            price: resp.price,
            fees: resp.fees,
            total_cost: resp.total_cost,
            remaining_balance: resp.remaining_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, quantity: i64, price: i64) -> PositionRecord {
        PositionRecord {
            id: Some(1),
            user_id: Some(9),
            symbol: "AAPL".into(),
            category: category.into(),
            quantity: Decimal::from(quantity),
            purchase_price: Decimal::from(price),
            total_cost: Decimal::from(quantity * price + 2),
            fees: Some(Decimal::TWO),
            purchase_date: None,
        }
    }

    #[test]
    fn test_convert_valid_record() {
        let r: PurchaseRecord = record("Stocks", 2, 100).try_into().unwrap();
        assert_eq!(r.category, Category::Stocks);
        assert_eq!(r.total_cost, Decimal::from(202));
        assert_eq!(r.id, Some(1));
    }

    #[test]
    fn test_convert_rejects_zero_quantity() {
        let err = PurchaseRecord::try_from(record("stocks", 0, 100)).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveQuantity(..)));
    }

    #[test]
    fn test_convert_rejects_unknown_category() {
        let err = PurchaseRecord::try_from(record("crypto", 1, 100)).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory(ref c, _) if c == "crypto"));
    }

    #[test]
    fn test_convert_rejects_negative_fees() {
        let mut wire = record("bonds", 1, 100);
        wire.fees = Some(Decimal::NEGATIVE_ONE);
        let err = PurchaseRecord::try_from(wire).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { field: "fees", .. }));
    }

    #[test]
    fn test_missing_fees_default_to_zero() {
        let mut wire = record("etfs", 1, 100);
        wire.fees = None;
        let r = PurchaseRecord::try_from(wire).unwrap();
        assert_eq!(r.fees, Decimal::ZERO);
    }
}

//! Conversion: TickPayload → PriceTick (TryFrom + validation).

use super::wire::TickPayload;
use super::PriceTick;
use crate::error::StreamError;
use crate::shared::Symbol;
use rust_decimal::Decimal;

impl TryFrom<TickPayload> for PriceTick {
    type Error = String;

    fn try_from(source: TickPayload) -> Result<Self, Self::Error> {
        let symbol = Symbol::from(source.symbol.trim());
        if symbol.is_empty() {
            return Err("empty symbol".to_string());
        }
        if source.price.is_sign_negative() {
            return Err(format!("negative price {} for {}", source.price, symbol));
        }
        Ok(Self {
            symbol,
            price: source.price,
            change: source.change.unwrap_or(Decimal::ZERO),
            change_percent: source.change_percent.unwrap_or(Decimal::ZERO),
        })
    }
}

impl PriceTick {
    /// Parse one price-channel payload.
    ///
    /// Failures are `StreamError::MalformedTick`, which the feed drops without
    /// ending the stream.
    pub fn parse(raw: &str) -> Result<PriceTick, StreamError> {
        let malformed = |reason: String| StreamError::MalformedTick {
            reason,
            raw: raw.to_string(),
        };
        let payload: TickPayload =
            serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
        PriceTick::try_from(payload).map_err(malformed)
    }
}

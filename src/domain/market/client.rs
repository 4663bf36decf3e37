//! Markets sub-client: candles, charts, quotes, price feed.

use crate::client::SimexClient;
use crate::domain::chart::ChartSeries;
use crate::domain::market::wire::CandleResponse;
use crate::error::SdkError;
use crate::shared::Symbol;
use rust_decimal::Decimal;
use std::time::Instant;

#[cfg(feature = "stream")]
use crate::shared::Category;
#[cfg(feature = "stream")]
use crate::stream::{MarketFeed, SseTickSource, TickSource, TickStream};

/// Sub-client for market data.
pub struct Markets<'a> {
    pub(crate) client: &'a SimexClient,
}

impl<'a> Markets<'a> {
    /// Historical daily candles for a symbol. Uses TTL cache.
    pub async fn candles(&self, symbol: &Symbol) -> Result<CandleResponse, SdkError> {
        {
            let cache = self.client.candle_cache.read().await;
            if let Some((candles, fetched_at)) = cache.get(symbol) {
                if fetched_at.elapsed() < self.client.candle_cache_ttl {
                    return Ok(candles.clone());
                }
            }
        }

        let candles = self.client.http.get_candles(symbol).await?;
        if candles.is_ok() {
            self.client
                .candle_cache
                .write()
                .await
                .insert(symbol.clone(), (candles.clone(), Instant::now()));
        }
        Ok(candles)
    }

    /// Chart series for a symbol in the current theme.
    ///
    /// Transport failures surface as errors; an unusable response yields an
    /// empty series.
    pub async fn chart(&self, symbol: &Symbol) -> Result<ChartSeries, SdkError> {
        let candles = self.candles(symbol).await?;
        Ok(ChartSeries::build(symbol.clone(), &candles, self.client.theme()))
    }

    /// Latest charted close for a symbol, or `None` when no quote is
    /// available. The quote is always the last point the chart shows.
    pub async fn latest_price(&self, symbol: &Symbol) -> Option<Decimal> {
        match self.chart(symbol).await {
            Ok(series) => {
                let close = series.last_value();
                if close.is_none() {
                    tracing::warn!(%symbol, "Quote unavailable, empty chart series");
                }
                close
            }
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "Quote unavailable");
                None
            }
        }
    }

    /// Open one price stream for a category.
    #[cfg(feature = "stream")]
    pub fn open(&self, category: Category) -> TickStream {
        self.source().open(category)
    }

    /// Spawn a live feed for the configured categories. Requires a tokio
    /// runtime; the feed stops when dropped.
    #[cfg(feature = "stream")]
    pub fn feed(&self) -> MarketFeed {
        MarketFeed::spawn(self.source(), self.client.stream_config.clone())
    }

    #[cfg(feature = "stream")]
    fn source(&self) -> SseTickSource {
        SseTickSource::new(self.client.http.clone())
    }

    /// Invalidate cached candles for a symbol.
    pub async fn invalidate(&self, symbol: &Symbol) {
        self.client.candle_cache.write().await.remove(symbol);
    }

    pub async fn clear_cache(&self) {
        self.client.candle_cache.write().await.clear();
    }
}

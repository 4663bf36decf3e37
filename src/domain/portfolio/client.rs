//! Portfolio sub-client: load, group, value, publish.

use crate::auth::Credential;
use crate::client::SimexClient;
use crate::domain::portfolio::{group, value, PortfolioState, PortfolioSummary};
use crate::error::SdkError;
use crate::shared::Symbol;
use futures_util::future::join_all;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::watch;

pub struct PortfolioClient<'a> {
    pub(crate) client: &'a SimexClient,
}

impl<'a> PortfolioClient<'a> {
    /// Load purchase records, group them and value them at the latest closes.
    ///
    /// Publishes `Loading` first, then `Loaded` or `Failed`. Quotes are fetched
    /// concurrently; a symbol whose quote fails is valued at its purchase price.
    pub async fn load(&self, auth: Option<&Credential>) -> Result<PortfolioSummary, SdkError> {
        self.client.portfolio.send_replace(PortfolioState::Loading);

        let records = match self.client.trading().positions(auth).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Portfolio load failed");
                self.client
                    .portfolio
                    .send_replace(PortfolioState::Failed(e.to_string()));
                return Err(e);
            }
        };

        let positions = group(&records);

        let markets = self.client.markets();
        let fetched = join_all(positions.iter().map(|p| markets.latest_price(&p.symbol))).await;
        let quotes: HashMap<&Symbol, Decimal> = positions
            .iter()
            .zip(fetched)
            .filter_map(|(p, quote)| quote.map(|q| (&p.symbol, q)))
            .collect();

        let summary = value(&positions, |symbol| quotes.get(symbol).copied());
        tracing::debug!(
            positions = summary.items.len(),
            total_value = %summary.total_value,
            "Portfolio valued"
        );
        self.client
            .portfolio
            .send_replace(PortfolioState::Loaded(summary.clone()));
        Ok(summary)
    }

    pub fn state(&self) -> PortfolioState {
        self.client.portfolio.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PortfolioState> {
        self.client.portfolio.subscribe()
    }
}

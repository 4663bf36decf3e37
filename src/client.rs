//! High-level client: `SimexClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, published values and
//! accessor methods.

use crate::domain::chart::Theme;
use crate::domain::market::client::Markets;
use crate::domain::market::wire::CandleResponse;
use crate::domain::portfolio::client::PortfolioClient;
use crate::domain::portfolio::PortfolioState;
use crate::domain::trading::client::Trading;
use crate::domain::trading::{CostPreview, PurchaseOrder};
use crate::domain::watchlist::client::WatchlistClient;
use crate::domain::watchlist::Watchlist;
use crate::error::SdkError;
use crate::http::{RetryConfig, RetryPolicy, SimexHttp};
use crate::network;
use crate::shared::Symbol;

use async_lock::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

#[cfg(feature = "stream")]
use crate::shared::Category;
#[cfg(feature = "stream")]
use crate::stream::StreamConfig;

// Re-export sub-client types for convenience.
pub use crate::domain::market::client::Markets as MarketsClient;
pub use crate::domain::portfolio::client::PortfolioClient as PortfolioSubClient;
pub use crate::domain::trading::client::Trading as TradingClient;
pub use crate::domain::watchlist::client::WatchlistClient as WatchlistSubClient;

/// The primary entry point for the SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.markets()`, `client.trading()`, etc. Clones share caches and
/// published state.
pub struct SimexClient {
    pub(crate) http: SimexHttp,
    #[cfg(feature = "stream")]
    pub(crate) stream_config: StreamConfig,
    /// Candle cache: symbol → (response, fetched_at)
    pub(crate) candle_cache: Arc<RwLock<HashMap<Symbol, (CandleResponse, Instant)>>>,
    pub(crate) candle_cache_ttl: Duration,
    /// Last server-reported balance; `None` until first fetched.
    pub(crate) balance: Arc<watch::Sender<Option<Decimal>>>,
    pub(crate) watchlist: Arc<watch::Sender<Watchlist>>,
    pub(crate) portfolio: Arc<watch::Sender<PortfolioState>>,
    pub(crate) theme: Arc<watch::Sender<Theme>>,
}

impl SimexClient {
    pub fn builder() -> SimexClientBuilder {
        SimexClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn markets(&self) -> Markets<'_> {
        Markets { client: self }
    }

    pub fn trading(&self) -> Trading<'_> {
        Trading { client: self }
    }

    pub fn watchlist(&self) -> WatchlistClient<'_> {
        WatchlistClient { client: self }
    }

    pub fn portfolio(&self) -> PortfolioClient<'_> {
        PortfolioClient { client: self }
    }

    #[cfg(feature = "stream")]
    pub fn stream_config(&self) -> &StreamConfig {
        &self.stream_config
    }

    // ── Balance ──────────────────────────────────────────────────────────

    pub fn balance(&self) -> Option<Decimal> {
        *self.balance.borrow()
    }

    pub fn subscribe_balance(&self) -> watch::Receiver<Option<Decimal>> {
        self.balance.subscribe()
    }

    pub(crate) fn set_balance(&self, balance: Decimal) {
        self.balance.send_replace(Some(balance));
    }

    /// Local cost estimate for an order, checked against the cached balance.
    ///
    /// Returns the preview and whether the cached balance covers it (`None`
    /// when no balance has been fetched yet).
    pub fn cost_preview(&self, order: &PurchaseOrder) -> (CostPreview, Option<bool>) {
        let preview = order.preview();
        let affordable = self.balance().map(|b| preview.affordable(b));
        (preview, affordable)
    }

    // ── Theme ────────────────────────────────────────────────────────────

    pub fn theme(&self) -> Theme {
        *self.theme.borrow()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.theme.send_if_modified(|current| {
            let changed = *current != theme;
            *current = theme;
            changed
        });
    }

    /// Switch between light and dark. Returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }

    pub fn subscribe_theme(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    /// Clear all HTTP caches.
    pub async fn clear_all_caches(&self) {
        self.candle_cache.write().await.clear();
    }
}

impl Clone for SimexClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            #[cfg(feature = "stream")]
            stream_config: self.stream_config.clone(),
            candle_cache: self.candle_cache.clone(),
            candle_cache_ttl: self.candle_cache_ttl,
            balance: self.balance.clone(),
            watchlist: self.watchlist.clone(),
            portfolio: self.portfolio.clone(),
            theme: self.theme.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct SimexClientBuilder {
    base_url: String,
    request_timeout: Duration,
    retry: RetryPolicy,
    #[cfg(feature = "stream")]
    stream_config: StreamConfig,
    candle_cache_ttl: Duration,
    theme: Theme,
}

impl Default for SimexClientBuilder {
    fn default() -> Self {
        Self {
            base_url: network::DEFAULT_API_URL.to_string(),
            request_timeout: network::DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::Idempotent,
            #[cfg(feature = "stream")]
            stream_config: StreamConfig::default(),
            candle_cache_ttl: Duration::from_secs(60),
            theme: Theme::default(),
        }
    }
}

impl SimexClientBuilder {
    /// Builder seeded from `SIMEX_API_URL`, `SIMEX_REFRESH_SECS` and
    /// `SIMEX_THEME`. Unset variables keep their defaults; unparseable ones
    /// are an error.
    pub fn from_env() -> Result<Self, SdkError> {
        let mut builder = Self::default();

        if let Ok(url) = std::env::var(network::ENV_API_URL) {
            builder = builder.base_url(&url);
        }

        #[cfg(feature = "stream")]
        if let Ok(secs) = std::env::var(network::ENV_REFRESH_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                SdkError::Validation(format!("{} must be whole seconds, got {:?}", network::ENV_REFRESH_SECS, secs))
            })?;
            builder = builder.refresh_period(Duration::from_secs(secs));
        }

        if let Ok(theme) = std::env::var(network::ENV_THEME) {
            builder = builder.theme(theme.parse().map_err(SdkError::Validation)?);
        }

        Ok(builder)
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Timeout for REST requests. Also bounds connecting the push channel.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Retry config for idempotent (GET) requests.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = RetryPolicy::Custom(retry);
        self
    }

    /// Retry policy for idempotent requests; `RetryPolicy::None` disables
    /// retries entirely.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    #[cfg(feature = "stream")]
    pub fn stream(mut self, config: StreamConfig) -> Self {
        self.stream_config = config;
        self
    }

    #[cfg(feature = "stream")]
    pub fn refresh_period(mut self, period: Duration) -> Self {
        self.stream_config.refresh_period = period;
        self
    }

    #[cfg(feature = "stream")]
    pub fn categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.stream_config.categories = categories.into_iter().collect();
        self
    }

    pub fn candle_cache_ttl(mut self, ttl: Duration) -> Self {
        self.candle_cache_ttl = ttl;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn build(self) -> Result<SimexClient, SdkError> {
        #[cfg(feature = "stream")]
        if self.stream_config.refresh_period.is_zero() {
            return Err(SdkError::Validation("refresh period must be non-zero".into()));
        }

        Ok(SimexClient {
            http: SimexHttp::new(&self.base_url, self.request_timeout, self.retry)?,
            #[cfg(feature = "stream")]
            stream_config: self.stream_config,
            candle_cache: Arc::new(RwLock::new(HashMap::new())),
            candle_cache_ttl: self.candle_cache_ttl,
            balance: Arc::new(watch::Sender::new(None)),
            watchlist: Arc::new(watch::Sender::new(Watchlist::default())),
            portfolio: Arc::new(watch::Sender::new(PortfolioState::NotLoaded)),
            theme: Arc::new(watch::Sender::new(self.theme)),
        })
    }
}

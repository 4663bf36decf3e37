//! # Simex SDK
//!
//! Client-side market-data reconciliation and portfolio valuation for the
//! simulated exchange.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Shared newtypes and pure domain logic: snapshot merging,
//!    watchlist filtering, chart series, position grouping, valuation, fees
//! 2. **Auth**: Opaque credential threaded through authorised calls
//! 3. **HTTP API**: `SimexHttp` with per-endpoint retry policies
//! 4. **Stream**: SSE price channels and the per-category `MarketFeed`
//! 5. **High-Level Client**: `SimexClient` with nested sub-clients, caching
//!    and `watch`-published state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use simex_sdk::prelude::*;
//!
//! let client = SimexClient::builder()
//!     .base_url("http://localhost:8080")
//!     .build()?;
//!
//! let feed = client.markets().feed();
//! let mut stocks = feed.subscribe(Category::Stocks).unwrap();
//!
//! let auth = Credential::new(token);
//! let watchlist = client.watchlist().fetch(Some(&auth)).await?;
//! let summary = client.portfolio().load(Some(&auth)).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network defaults and environment variable names.
pub mod network;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Session credential for trading and watchlist calls.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: Stream ──────────────────────────────────────────────────────────

/// Server-push price feed.
#[cfg(feature = "stream")]
pub mod stream;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `SimexClient`, the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Category, Symbol};

    // Domain types: market + chart
    pub use crate::domain::chart::{ChartPalette, ChartPoint, ChartSeries, Theme};
    pub use crate::domain::market::wire::CandleResponse;
    pub use crate::domain::market::{CategorySnapshot, PriceTick, Trend};

    // Domain types: watchlist
    pub use crate::domain::watchlist::Watchlist;

    // Domain types: trading + portfolio
    pub use crate::domain::portfolio::{
        GroupedPosition, PortfolioItem, PortfolioState, PortfolioSummary, PriceSource,
    };
    pub use crate::domain::trading::{BuyReceipt, CostPreview, PurchaseOrder, PurchaseRecord};

    // Errors
    pub use crate::error::{AuthError, HttpError, SdkError, StreamError, TradingError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // Auth
    pub use crate::auth::Credential;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        MarketsClient, PortfolioSubClient, SimexClient, SimexClientBuilder, TradingClient,
        WatchlistSubClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // Stream
    #[cfg(feature = "stream")]
    pub use crate::stream::{FeedStatus, MarketFeed, StreamConfig, TickSource, TickStream};
}

//! Server-push price feed.
//!
//! - `sse.rs`: incremental Server-Sent Events decoder
//! - `source.rs`: [`TickSource`] trait + the HTTP/SSE implementation
//! - `feed.rs`: [`MarketFeed`]: one background task per category that
//!   merges ticks into a [`CategorySnapshot`](crate::domain::market::CategorySnapshot)
//!   and publishes it through a `watch` channel

pub mod feed;
pub mod source;
pub mod sse;

use crate::shared::Category;
use std::time::Duration;

pub use feed::MarketFeed;
pub use source::{decode_ticks, SseTickSource, TickSource, TickStream};
pub use sse::{Decoded, SseDecoder};

/// Feed configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Each category's subscription is replaced on this period.
    pub refresh_period: Duration,
    pub categories: Vec<Category>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            refresh_period: crate::network::DEFAULT_REFRESH_PERIOD,
            categories: Category::ALL.to_vec(),
        }
    }
}

/// Connection state of one category's subscription.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
    /// A subscription was opened and no tick has arrived on it yet.
    #[default]
    Connecting,
    /// At least one tick arrived on the current subscription.
    Streaming,
    /// The server closed the channel cleanly.
    Completed,
    /// The channel failed; it is re-opened on the next refresh.
    Interrupted(String),
}

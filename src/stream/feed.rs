//! Live market feed: one background task per category.
//!
//! Each task owns its category's snapshot and is its only writer. On every
//! refresh tick the current subscription is dropped and a new one opened; the
//! new subscription accumulates into an empty snapshot, which is published
//! only once its first tick has been merged. Subscribers therefore keep
//! seeing the previous period's snapshot until fresh data arrives.

use crate::domain::market::{CategorySnapshot, PriceTick};
use crate::domain::watchlist::Watchlist;
use crate::error::StreamError;
use crate::shared::Category;
use crate::stream::source::{TickSource, TickStream};
use crate::stream::{FeedStatus, StreamConfig};

use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

struct CategoryChannels {
    snapshot: watch::Receiver<CategorySnapshot>,
    status: watch::Receiver<FeedStatus>,
}

/// Running price feed. Dropping it stops every category task.
pub struct MarketFeed {
    channels: HashMap<Category, CategoryChannels>,
    tasks: Vec<JoinHandle<()>>,
}

impl MarketFeed {
    /// Start one task per configured category. Must be called inside a
    /// tokio runtime.
    pub fn spawn<S: TickSource>(source: S, config: StreamConfig) -> Self {
        let source = Arc::new(source);
        let mut channels = HashMap::new();
        let mut tasks = Vec::new();

        for category in config.categories {
            if channels.contains_key(&category) {
                continue;
            }
            let (snapshot_tx, snapshot_rx) = watch::channel(CategorySnapshot::new(category));
            let (status_tx, status_rx) = watch::channel(FeedStatus::Connecting);

            tasks.push(tokio::spawn(run_category(
                source.clone(),
                category,
                config.refresh_period,
                snapshot_tx,
                status_tx,
            )));
            channels.insert(
                category,
                CategoryChannels {
                    snapshot: snapshot_rx,
                    status: status_rx,
                },
            );
        }

        Self { channels, tasks }
    }

    /// Receiver for a category's snapshot. The current value is available
    /// immediately; every merged tick publishes a new one.
    pub fn subscribe(&self, category: Category) -> Option<watch::Receiver<CategorySnapshot>> {
        self.channels.get(&category).map(|c| c.snapshot.clone())
    }

    pub fn subscribe_status(&self, category: Category) -> Option<watch::Receiver<FeedStatus>> {
        self.channels.get(&category).map(|c| c.status.clone())
    }

    /// Latest published snapshot for a category.
    pub fn snapshot(&self, category: Category) -> Option<CategorySnapshot> {
        self.channels
            .get(&category)
            .map(|c| c.snapshot.borrow().clone())
    }

    pub fn status(&self, category: Category) -> Option<FeedStatus> {
        self.channels.get(&category).map(|c| c.status.borrow().clone())
    }

    /// The watched subset of a category's latest snapshot.
    pub fn watched(&self, category: Category, watchlist: &Watchlist) -> CategorySnapshot {
        match self.channels.get(&category) {
            Some(c) => c.snapshot.borrow().filtered(watchlist.symbols(category)),
            None => CategorySnapshot::new(category),
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.channels.keys().copied()
    }

    /// Stop all category tasks. Published values stay readable.
    pub fn shutdown(&mut self) {
        for handle in self.tasks.drain(..) {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|h| !h.is_finished())
    }
}

impl Drop for MarketFeed {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_category<S: TickSource>(
    source: Arc<S>,
    category: Category,
    refresh_period: Duration,
    snapshot_tx: watch::Sender<CategorySnapshot>,
    status_tx: watch::Sender<FeedStatus>,
) {
    let mut refresh = tokio::time::interval(refresh_period);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stream: Option<TickStream> = None;
    let mut pending = CategorySnapshot::new(category);

    loop {
        tokio::select! {
            // ── a) Refresh: replace the subscription ─────────────────────
            _ = refresh.tick() => {
                // Previous stream is dropped before the new one is polled.
                drop(stream.take());
                pending = CategorySnapshot::new(category);
                set_status(&status_tx, FeedStatus::Connecting);
                tracing::info!(%category, "Opening price subscription");
                stream = Some(source.open(category));
            }

            // ── b) Next item from the current subscription ───────────────
            item = next_item(&mut stream) => {
                match item {
                    Some(Ok(tick)) => {
                        pending.apply(tick);
                        snapshot_tx.send_replace(pending.clone());
                        set_status(&status_tx, FeedStatus::Streaming);
                    }
                    Some(Err(e)) if e.is_terminal() => {
                        tracing::warn!(%category, error = %e, "Price channel interrupted");
                        set_status(&status_tx, FeedStatus::Interrupted(e.to_string()));
                        stream = None;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(%category, error = %e, "Dropping malformed tick");
                    }
                    None => {
                        tracing::info!(%category, "Price channel closed by server");
                        set_status(&status_tx, FeedStatus::Completed);
                        stream = None;
                    }
                }
            }
        }
    }
}

/// Next item of the active stream; pends forever when there is none.
async fn next_item(stream: &mut Option<TickStream>) -> Option<Result<PriceTick, StreamError>> {
    match stream {
        Some(s) => s.next().await,
        None => std::future::pending().await,
    }
}

fn set_status(tx: &watch::Sender<FeedStatus>, status: FeedStatus) {
    tx.send_if_modified(|current| {
        if *current == status {
            false
        } else {
            *current = status;
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Symbol;
    use futures_util::stream;
    use rust_decimal::Decimal;

    /// Replays a fixed script on every `open`.
    struct Scripted(Vec<Result<PriceTick, StreamError>>);

    impl TickSource for Scripted {
        fn open(&self, _category: Category) -> TickStream {
            Box::pin(stream::iter(self.0.clone()))
        }
    }

    fn tick(symbol: &str, price: i64) -> Result<PriceTick, StreamError> {
        Ok(PriceTick {
            symbol: Symbol::from(symbol),
            price: Decimal::from(price),
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
        })
    }

    fn config() -> StreamConfig {
        StreamConfig {
            refresh_period: Duration::from_secs(3600),
            categories: vec![Category::Stocks],
        }
    }

    async fn wait_for_status(feed: &MarketFeed, category: Category, want: FeedStatus) {
        let mut rx = feed.subscribe_status(category).unwrap();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| *s == want))
            .await
            .expect("status not reached")
            .unwrap();
    }

    #[tokio::test]
    async fn test_feed_merges_ticks() {
        let feed = MarketFeed::spawn(
            Scripted(vec![tick("AAPL", 1), tick("MSFT", 2), tick("AAPL", 3)]),
            config(),
        );
        wait_for_status(&feed, Category::Stocks, FeedStatus::Completed).await;

        let snapshot = feed.snapshot(Category::Stocks).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.ticks()[0].symbol.as_str(), "AAPL");
        assert_eq!(snapshot.ticks()[0].price, Decimal::from(3));
    }

    #[tokio::test]
    async fn test_feed_skips_malformed_and_marks_interrupted() {
        let feed = MarketFeed::spawn(
            Scripted(vec![
                Err(StreamError::MalformedTick {
                    reason: "bad".into(),
                    raw: "x".into(),
                }),
                tick("TSLA", 200),
                Err(StreamError::Channel("reset".into())),
            ]),
            config(),
        );
        wait_for_status(
            &feed,
            Category::Stocks,
            FeedStatus::Interrupted("Channel error: reset".into()),
        )
        .await;

        let snapshot = feed.snapshot(Category::Stocks).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.price_of(&Symbol::from("TSLA")), Some(Decimal::from(200)));
    }

    #[tokio::test]
    async fn test_unknown_category_is_none() {
        let feed = MarketFeed::spawn(Scripted(vec![]), config());
        assert!(feed.subscribe(Category::Bonds).is_none());
        assert!(feed.watched(Category::Bonds, &Watchlist::default()).is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_stops_tasks() {
        let mut feed = MarketFeed::spawn(Scripted(vec![]), config());
        feed.shutdown();
        assert!(feed.tasks.is_empty());
        assert!(feed.snapshot(Category::Stocks).is_some());
    }
}

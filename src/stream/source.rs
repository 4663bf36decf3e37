//! Tick sources: where a category's price ticks come from.

use crate::domain::market::PriceTick;
use crate::error::StreamError;
use crate::http::SimexHttp;
use crate::shared::Category;
use crate::stream::sse::SseDecoder;

use async_stream::stream;
use futures_util::stream::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;

/// A category's tick stream.
///
/// Yields `MalformedTick` errors in-line and keeps going; a `Channel` error
/// is always the last item. Dropping the stream releases the connection.
pub type TickStream = Pin<Box<dyn Stream<Item = Result<PriceTick, StreamError>> + Send>>;

/// Opens tick subscriptions.
pub trait TickSource: Send + Sync + 'static {
    /// Subscribe to one category. Connecting happens when the stream is
    /// first polled; connection failures arrive as a `Channel` error.
    fn open(&self, category: Category) -> TickStream;
}

/// Decode an SSE byte stream into ticks.
pub fn decode_ticks<S, B, E>(bytes: S) -> impl Stream<Item = Result<PriceTick, StreamError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    stream! {
        let mut decoder = SseDecoder::new();
        futures_util::pin_mut!(bytes);

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(StreamError::Channel(e.to_string()));
                    return;
                }
            };
            let decoded = decoder.push(chunk.as_ref());
            for raw in decoded.events {
                yield PriceTick::parse(&raw);
            }
            if let Some(e) = decoded.error {
                yield Err(e);
                return;
            }
        }

        match decoder.finish() {
            Ok(Some(raw)) => yield PriceTick::parse(&raw),
            Ok(None) => {}
            Err(e) => yield Err(e),
        }
    }
}

/// Ticks from `GET /api/market/prices/{category}` (Server-Sent Events).
#[derive(Clone)]
pub struct SseTickSource {
    http: SimexHttp,
}

impl SseTickSource {
    pub fn new(http: SimexHttp) -> Self {
        Self { http }
    }
}

impl TickSource for SseTickSource {
    fn open(&self, category: Category) -> TickStream {
        let http = self.http.clone();
        Box::pin(stream! {
            let resp = match http.open_price_channel(category).await {
                Ok(resp) => resp,
                Err(e) => {
                    yield Err(StreamError::Channel(e.to_string()));
                    return;
                }
            };
            tracing::debug!(%category, "Price channel connected");

            let ticks = decode_ticks(resp.bytes_stream());
            futures_util::pin_mut!(ticks);
            while let Some(item) = ticks.next().await {
                yield item;
            }
        })
    }
}

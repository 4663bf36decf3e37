//! HTTP client layer: `SimexHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::SimexHttp;
pub use retry::{RetryConfig, RetryPolicy};

//! Unified SDK error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Trading error: {0}")]
    Trading(#[from] TradingError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The server answered with `success: false`.
    #[error("Remote rejected request: {0}")]
    Remote(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

#[cfg(feature = "http")]
impl HttpError {
    /// Classify a reqwest failure, surfacing timeouts as [`HttpError::Timeout`].
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Reqwest(err)
        }
    }
}

/// Push-channel errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The transport failed or a frame could not be decoded. Terminal: the
    /// stream ends after yielding this and must be re-opened.
    #[error("Channel error: {0}")]
    Channel(String),

    /// One event carried a payload that is not a valid tick. The event is
    /// dropped and the stream continues.
    #[error("Malformed tick: {reason}, raw: {raw}")]
    MalformedTick { reason: String, raw: String },
}

impl StreamError {
    /// Whether the stream ends after this error.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamError::Channel(_))
    }
}

/// Authentication errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential was supplied for an operation that requires one.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The server rejected the supplied credential.
    #[error("Credential rejected: {0}")]
    Rejected(String),
}

/// Purchase rejections, surfaced verbatim from the trading service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradingError {
    #[error("Insufficient funds: required {required}, available {available} (fees {fees})")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
        fees: Decimal,
    },

    #[error("Invalid purchase: {0}")]
    InvalidPurchase(String),
}

//! Low-level HTTP client: `SimexHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens in the sub-clients). Internal to the SDK; `SimexClient` wraps this.

use crate::auth::Credential;
use crate::domain::market::wire::CandleResponse;
use crate::domain::trading::wire::{BalanceResponse, BuyRequest, BuyResponse, PositionsResponse};
use crate::domain::watchlist::wire::{AddRequest, RemoveRequest, WatchlistEnvelope};
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::shared::{Category, Symbol};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Low-level HTTP client for the exchange REST API.
pub struct SimexHttp {
    base_url: String,
    client: Client,
    /// Client without a request timeout, for long-lived push channels.
    #[cfg(feature = "stream")]
    stream_client: Client,
    /// Policy for idempotent reads. Writes never retry.
    read_retry: RetryPolicy,
}

impl SimexHttp {
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        read_retry: RetryPolicy,
    ) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        #[cfg(feature = "stream")]
        let stream_client = Client::builder()
            .connect_timeout(request_timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            #[cfg(feature = "stream")]
            stream_client,
            read_retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Market ───────────────────────────────────────────────────────────

    pub async fn get_candles(&self, symbol: &Symbol) -> Result<CandleResponse, HttpError> {
        let url = format!(
            "{}/api/market/candles/{}",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        );
        self.get(&url, None, self.read_retry.clone()).await
    }

    /// Open the server-push price channel for one category.
    ///
    /// Returns the raw streaming response; SSE decoding happens in
    /// [`crate::stream::source`].
    #[cfg(feature = "stream")]
    pub async fn open_price_channel(&self, category: Category) -> Result<reqwest::Response, HttpError> {
        let url = format!("{}/api/market/prices/{}", self.base_url, category.as_str());
        let resp = self
            .stream_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(HttpError::transport)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let retry_after_ms = retry_after_ms(resp.headers());
        let body = resp.text().await.unwrap_or_default();
        Err(map_status(status.as_u16(), body, retry_after_ms))
    }

    // ── Trading ──────────────────────────────────────────────────────────

    pub async fn get_balance(&self, auth: &Credential) -> Result<BalanceResponse, HttpError> {
        let url = format!("{}/api/trading/balance", self.base_url);
        self.get(&url, Some(auth), self.read_retry.clone()).await
    }

    pub async fn get_positions(&self, auth: &Credential) -> Result<PositionsResponse, HttpError> {
        let url = format!("{}/api/trading/positions", self.base_url);
        self.get(&url, Some(auth), self.read_retry.clone()).await
    }

    pub async fn buy(&self, auth: &Credential, request: &BuyRequest) -> Result<BuyResponse, HttpError> {
        let url = format!("{}/api/trading/buy", self.base_url);
        self.post(&url, Some(auth), request, RetryPolicy::None).await
    }

    // ── Watchlist ────────────────────────────────────────────────────────

    pub async fn get_watchlist(&self, auth: &Credential) -> Result<WatchlistEnvelope, HttpError> {
        let url = format!("{}/api/watchlist", self.base_url);
        self.get(&url, Some(auth), self.read_retry.clone()).await
    }

    pub async fn add_to_watchlist(
        &self,
        auth: &Credential,
        symbol: &Symbol,
        category: Category,
    ) -> Result<WatchlistEnvelope, HttpError> {
        let url = format!("{}/api/watchlist/add", self.base_url);
        let body = AddRequest {
            symbol: symbol.clone(),
            category,
        };
        self.post(&url, Some(auth), &body, RetryPolicy::None).await
    }

    pub async fn remove_from_watchlist(
        &self,
        auth: &Credential,
        symbol: &Symbol,
    ) -> Result<WatchlistEnvelope, HttpError> {
        let url = format!("{}/api/watchlist/remove", self.base_url);
        let body = RemoveRequest {
            symbol: symbol.clone(),
        };
        self.post(&url, Some(auth), &body, RetryPolicy::None).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        auth: Option<&Credential>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::GET, url, auth, None::<&()>, retry)
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        auth: Option<&Credential>,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::POST, url, auth, Some(body), retry)
            .await
    }

    async fn request_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        auth: Option<&Credential>,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match retry {
            RetryPolicy::None => {
                return self.do_request(&method, url, auth, body).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c,
        };

        let mut attempt = 0;
        loop {
            let err = match self.do_request::<T, B>(&method, url, auth, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };
            if !is_retryable(&err, &config) {
                return Err(err);
            }
            if attempt >= config.max_retries {
                if attempt == 0 {
                    return Err(err);
                }
                return Err(HttpError::MaxRetriesExceeded {
                    attempts: attempt + 1,
                    last_error: err.to_string(),
                });
            }

            let delay = match &err {
                HttpError::RateLimited {
                    retry_after_ms: Some(ms),
                } => Duration::from_millis(*ms).min(config.max_delay),
                _ => config.delay_for_attempt(attempt),
            };
            tracing::debug!(
                attempt = attempt + 1,
                max = config.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying request to {}",
                url
            );
            futures_timer::Delay::new(delay).await;
            attempt += 1;
        }
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &reqwest::Method,
        url: &str,
        auth: Option<&Credential>,
        body: Option<&B>,
    ) -> Result<T, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        if let Some(credential) = auth {
            req = req.header(reqwest::header::AUTHORIZATION, credential.header_value());
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(HttpError::transport)?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await.map_err(HttpError::transport)?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let retry_after_ms = retry_after_ms(resp.headers());
        let body_text = resp.text().await.unwrap_or_default();
        Err(map_status(status_code, body_text, retry_after_ms))
    }
}

fn is_retryable(err: &HttpError, config: &RetryConfig) -> bool {
    match err {
        HttpError::ServerError { status, .. } => config.retryable_statuses.contains(status),
        HttpError::RateLimited { .. } => config.retryable_statuses.contains(&429),
        HttpError::Timeout => true,
        HttpError::Reqwest(re) => re.is_connect(),
        _ => false,
    }
}

/// `Retry-After` in delta-seconds form. HTTP dates are ignored.
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

fn map_status(status_code: u16, body_text: String, retry_after_ms: Option<u64>) -> HttpError {
    match status_code {
        401 => HttpError::Unauthorized,
        404 => HttpError::NotFound(body_text),
        429 => HttpError::RateLimited { retry_after_ms },
        400..=499 => HttpError::BadRequest(body_text),
        _ => HttpError::ServerError {
            status: status_code,
            body: body_text,
        },
    }
}

impl Clone for SimexHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            #[cfg(feature = "stream")]
            stream_client: self.stream_client.clone(),
            read_retry: self.read_retry.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn test_map_status() {
        assert!(matches!(map_status(401, String::new(), None), HttpError::Unauthorized));
        assert!(matches!(map_status(404, "gone".into(), None), HttpError::NotFound(b) if b == "gone"));
        assert!(matches!(map_status(400, "{}".into(), None), HttpError::BadRequest(_)));
        assert!(matches!(
            map_status(429, String::new(), Some(2000)),
            HttpError::RateLimited {
                retry_after_ms: Some(2000)
            }
        ));
        assert!(matches!(
            map_status(503, String::new(), None),
            HttpError::ServerError { status: 503, .. }
        ));
    }

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_ms(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(retry_after_ms(&headers), Some(3000));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"));
        assert_eq!(retry_after_ms(&headers), None);
    }

    #[test]
    fn test_retryable_errors() {
        let config = RetryConfig::idempotent();
        assert!(is_retryable(&HttpError::Timeout, &config));
        assert!(is_retryable(
            &HttpError::RateLimited {
                retry_after_ms: None
            },
            &config
        ));
        assert!(is_retryable(
            &HttpError::ServerError {
                status: 502,
                body: String::new()
            },
            &config
        ));
        assert!(!is_retryable(
            &HttpError::ServerError {
                status: 500,
                body: String::new()
            },
            &config
        ));
        assert!(!is_retryable(&HttpError::BadRequest("no".into()), &config));
        assert!(!is_retryable(&HttpError::Unauthorized, &config));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let http = SimexHttp::new(
            "http://localhost:8080/",
            Duration::from_secs(5),
            RetryPolicy::Idempotent,
        )
        .unwrap();
        assert_eq!(http.base_url(), "http://localhost:8080");
    }
}

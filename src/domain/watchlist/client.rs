//! Watchlist sub-client: fetch, add, remove.

use crate::auth::Credential;
use crate::client::SimexClient;
use crate::domain::trading::client::auth_rejection;
use crate::domain::watchlist::wire::WatchlistEnvelope;
use crate::domain::watchlist::Watchlist;
use crate::error::{HttpError, SdkError};
use crate::shared::{Category, Symbol};
use tokio::sync::watch;

pub struct WatchlistClient<'a> {
    pub(crate) client: &'a SimexClient,
}

impl<'a> WatchlistClient<'a> {
    /// Fetch the watchlist and publish it.
    pub async fn fetch(&self, auth: Option<&Credential>) -> Result<Watchlist, SdkError> {
        let auth = Credential::require(auth)?;
        let result = self.client.http.get_watchlist(auth).await;
        self.accept(result)
    }

    /// Watch `symbol` under `category`. Publishes the server's updated list.
    pub async fn add(
        &self,
        auth: Option<&Credential>,
        symbol: &Symbol,
        category: Category,
    ) -> Result<Watchlist, SdkError> {
        let auth = Credential::require(auth)?;
        if symbol.is_empty() {
            return Err(SdkError::Validation("Symbol must not be empty".into()));
        }
        let result = self.client.http.add_to_watchlist(auth, symbol, category).await;
        self.accept(result)
    }

    /// Stop watching `symbol`. Publishes the server's updated list.
    pub async fn remove(
        &self,
        auth: Option<&Credential>,
        symbol: &Symbol,
    ) -> Result<Watchlist, SdkError> {
        let auth = Credential::require(auth)?;
        if symbol.is_empty() {
            return Err(SdkError::Validation("Symbol must not be empty".into()));
        }
        let result = self.client.http.remove_from_watchlist(auth, symbol).await;
        self.accept(result)
    }

    /// Last published watchlist (empty until the first successful fetch).
    pub fn current(&self) -> Watchlist {
        self.client.watchlist.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Watchlist> {
        self.client.watchlist.subscribe()
    }

    fn accept(&self, result: Result<WatchlistEnvelope, HttpError>) -> Result<Watchlist, SdkError> {
        let envelope = result.map_err(remote_message)?;
        if !envelope.success {
            return Err(SdkError::Remote(
                envelope.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        let watchlist = envelope.watchlist.unwrap_or_default();
        self.client.watchlist.send_replace(watchlist.clone());
        Ok(watchlist)
    }
}

/// Lifts the `message` out of a 4xx envelope, when there is one.
fn remote_message(err: HttpError) -> SdkError {
    let body = match &err {
        HttpError::BadRequest(body) | HttpError::NotFound(body) => body,
        _ => return auth_rejection(err),
    };
    match serde_json::from_str::<WatchlistEnvelope>(body) {
        Ok(WatchlistEnvelope {
            message: Some(message),
            ..
        }) => SdkError::Remote(message),
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;

    #[test]
    fn test_remote_message_from_envelope() {
        let err = remote_message(HttpError::BadRequest(
            r#"{"success":false,"message":"Symbol fehlt"}"#.into(),
        ));
        assert!(matches!(err, SdkError::Remote(m) if m == "Symbol fehlt"));
    }

    #[test]
    fn test_remote_message_plain_body() {
        let err = remote_message(HttpError::BadRequest("nope".into()));
        assert!(matches!(err, SdkError::Http(HttpError::BadRequest(b)) if b == "nope"));
    }

    #[test]
    fn test_remote_message_unauthorized() {
        assert!(matches!(
            remote_message(HttpError::Unauthorized),
            SdkError::Auth(AuthError::Rejected(_))
        ));
    }
}

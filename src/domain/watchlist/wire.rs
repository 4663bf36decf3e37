//! Wire types for watchlist endpoints.

use super::Watchlist;
use crate::shared::{Category, Symbol};
use serde::{Deserialize, Serialize};

/// Envelope returned by every watchlist endpoint, including 4xx answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchlistEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub watchlist: Option<Watchlist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddRequest {
    pub symbol: Symbol,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveRequest {
    pub symbol: Symbol,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let json = r#"{"success":true,"message":"Symbol hinzugefügt",
            "watchlist":{"stocks":["AAPL"],"etfs":[],"bonds":["TLT"]}}"#;
        let env: WatchlistEnvelope = serde_json::from_str(json).unwrap();
        assert!(env.success);
        let w = env.watchlist.unwrap();
        assert_eq!(w.bonds, vec![Symbol::from("TLT")]);
    }

    #[test]
    fn test_envelope_failure() {
        let env: WatchlistEnvelope =
            serde_json::from_str(r#"{"success":false,"message":"Symbol fehlt"}"#).unwrap();
        assert!(!env.success);
        assert!(env.watchlist.is_none());
    }

    #[test]
    fn test_add_request_serialize() {
        let req = AddRequest {
            symbol: Symbol::from("SPY"),
            category: Category::Etfs,
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"symbol":"SPY","category":"etfs"}"#
        );
    }
}

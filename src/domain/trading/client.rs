//! Trading sub-client: balance, purchase history, purchases.

use crate::auth::Credential;
use crate::client::SimexClient;
use crate::domain::trading::wire::{BuyRequest, RejectionBody};
use crate::domain::trading::{BuyReceipt, CostPreview, PurchaseOrder, PurchaseRecord};
use crate::error::{AuthError, HttpError, SdkError, TradingError};
use rust_decimal::Decimal;
use tokio::sync::watch;

pub struct Trading<'a> {
    pub(crate) client: &'a SimexClient,
}

impl<'a> Trading<'a> {
    /// Fetch the balance and update the cached value.
    pub async fn balance(&self, auth: Option<&Credential>) -> Result<Decimal, SdkError> {
        let auth = Credential::require(auth)?;
        let resp = self
            .client
            .http
            .get_balance(auth)
            .await
            .map_err(auth_rejection)?;
        self.client.set_balance(resp.balance);
        Ok(resp.balance)
    }

    /// Last balance the server reported, if any.
    pub fn cached_balance(&self) -> Option<Decimal> {
        *self.client.balance.borrow()
    }

    pub fn subscribe_balance(&self) -> watch::Receiver<Option<Decimal>> {
        self.client.balance.subscribe()
    }

    /// Fetch the user's purchase records. Also resyncs the cached balance.
    pub async fn positions(&self, auth: Option<&Credential>) -> Result<Vec<PurchaseRecord>, SdkError> {
        let auth = Credential::require(auth)?;
        let resp = self
            .client
            .http
            .get_positions(auth)
            .await
            .map_err(auth_rejection)?;

        if let Some(balance) = resp.balance {
            self.client.set_balance(balance);
        }

        resp.positions
            .into_iter()
            .map(|record| {
                PurchaseRecord::try_from(record).map_err(|e| SdkError::Validation(e.to_string()))
            })
            .collect()
    }

    /// Local cost estimate for an order.
    pub fn preview(&self, order: &PurchaseOrder) -> CostPreview {
        order.preview()
    }

    /// Submit a purchase.
    ///
    /// The cached balance follows the server: on success it becomes the
    /// remaining balance, on an insufficient-funds rejection it becomes the
    /// reported available amount, and on any other failure it is re-fetched.
    pub async fn buy(
        &self,
        auth: Option<&Credential>,
        order: &PurchaseOrder,
    ) -> Result<BuyReceipt, SdkError> {
        let auth = Credential::require(auth)?;
        order
            .validate()
            .map_err(|e| TradingError::InvalidPurchase(e.to_string()))?;

        let preview = order.preview();
        let request = BuyRequest {
            symbol: order.symbol.clone(),
            category: order.category,
            quantity: order.quantity,
            price: order.price,
        };

        match self.client.http.buy(auth, &request).await {
            Ok(resp) => {
                let receipt = BuyReceipt::from(resp);
                if receipt.total_cost != preview.total_cost {
                    tracing::warn!(
                        symbol = %order.symbol,
                        preview = %preview.total_cost,
                        committed = %receipt.total_cost,
                        "Committed total cost differs from preview"
                    );
                }
                self.client.set_balance(receipt.remaining_balance);
                tracing::info!(
                    symbol = %receipt.symbol,
                    quantity = %receipt.quantity,
                    total_cost = %receipt.total_cost,
                    "Purchase committed"
                );
                Ok(receipt)
            }
            Err(HttpError::BadRequest(body)) => {
                let err = rejection(&body);
                if let TradingError::InsufficientFunds { available, .. } = &err {
                    self.client.set_balance(*available);
                } else {
                    self.resync_balance(auth).await;
                }
                Err(err.into())
            }
            Err(e) => {
                let err = auth_rejection(e);
                if !matches!(err, SdkError::Auth(_)) {
                    self.resync_balance(auth).await;
                }
                Err(err)
            }
        }
    }

    async fn resync_balance(&self, auth: &Credential) {
        match self.client.http.get_balance(auth).await {
            Ok(resp) => self.client.set_balance(resp.balance),
            Err(e) => tracing::debug!(error = %e, "Balance resync failed"),
        }
    }
}

/// Interpret the body of a 4xx purchase response.
fn rejection(body: &str) -> TradingError {
    match serde_json::from_str::<RejectionBody>(body) {
        Ok(RejectionBody {
            required: Some(required),
            available: Some(available),
            fees,
            ..
        }) => TradingError::InsufficientFunds {
            required,
            available,
            fees: fees.unwrap_or(Decimal::ZERO),
        },
        Ok(parsed) => TradingError::InvalidPurchase(parsed.error),
        Err(_) => TradingError::InvalidPurchase(body.to_string()),
    }
}

/// Maps 401 to an auth error; other HTTP errors pass through.
pub(crate) fn auth_rejection(err: HttpError) -> SdkError {
    match err {
        HttpError::Unauthorized => AuthError::Rejected("session token was not accepted".into()).into(),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_insufficient_funds() {
        let err = rejection(r#"{"error":"Insufficient funds","required":1007,"available":500,"fees":7}"#);
        assert_eq!(
            err,
            TradingError::InsufficientFunds {
                required: Decimal::from(1007),
                available: Decimal::from(500),
                fees: Decimal::from(7),
            }
        );
    }

    #[test]
    fn test_rejection_invalid_purchase() {
        let err = rejection(r#"{"error":"Quantity must be positive"}"#);
        assert_eq!(err, TradingError::InvalidPurchase("Quantity must be positive".into()));
    }

    #[test]
    fn test_rejection_unparseable_body() {
        assert_eq!(
            rejection("Bad Request"),
            TradingError::InvalidPurchase("Bad Request".into())
        );
    }

    #[test]
    fn test_auth_rejection_mapping() {
        assert!(matches!(
            auth_rejection(HttpError::Unauthorized),
            SdkError::Auth(AuthError::Rejected(_))
        ));
        assert!(matches!(
            auth_rejection(HttpError::Timeout),
            SdkError::Http(HttpError::Timeout)
        ));
    }
}

//! Hosted payment page sessions.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::payments::records::TransactionId;

/// What the gateway needs to open a hosted payment page for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSessionRequest {
    pub tran_id: TransactionId,
    /// Minor units.
    pub total_amount: u64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: String,
    pub item_count: u64,
    pub product_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    pub redirect_url: String,
}

/// The gateway's own record of a payment, looked up by the validation id it sent with the
/// success callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentValidation {
    pub status: String,
    pub tran_id: Option<String>,
    /// Minor units.
    pub amount: Option<u64>,
    pub currency: Option<String>,
}

impl PaymentValidation {
    /// Whether the gateway reports the payment as settled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status.eq_ignore_ascii_case("VALID") || self.status.eq_ignore_ascii_case("VALIDATED")
    }
}

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentGatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway refused to open a session.
    #[error("payment gateway rejected the session: {0}")]
    Rejected(String),

    /// The gateway returned a non-2xx response or unexpected body.
    #[error("unexpected response from payment gateway: {0}")]
    UnexpectedResponse(String),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted payment session and return the page to redirect the shopper to.
    async fn create_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<PaymentSession, PaymentGatewayError>;

    /// Look up a completed payment by the validation id from the success callback.
    async fn validate(&self, val_id: &str) -> Result<PaymentValidation, PaymentGatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation(status: &str) -> PaymentValidation {
        PaymentValidation {
            status: status.to_string(),
            tran_id: None,
            amount: None,
            currency: None,
        }
    }

    #[test]
    fn valid_and_validated_are_settled() {
        assert!(validation("VALID").is_valid());
        assert!(validation("VALIDATED").is_valid());
        assert!(!validation("INVALID_TRANSACTION").is_valid());
        assert!(!validation("FAILED").is_valid());
    }
}

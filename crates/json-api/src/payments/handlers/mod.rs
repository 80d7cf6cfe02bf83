//! Payment Handlers

pub(crate) mod callback;
pub(crate) mod start;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::payments::records::PaymentTransactionRecord;

/// Payment Transaction Response
///
/// `amount` is in poisha.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TransactionResponse {
    pub tran_id: Uuid,
    pub order_uuid: Uuid,
    pub amount: u64,
    pub currency: String,

    /// `initiated`, `succeeded`, `failed` or `cancelled`
    pub status: String,
}

impl From<PaymentTransactionRecord> for TransactionResponse {
    fn from(transaction: PaymentTransactionRecord) -> Self {
        Self {
            tran_id: transaction.tran_id.into_uuid(),
            order_uuid: transaction.order_uuid.into_uuid(),
            amount: transaction.amount,
            currency: transaction.currency,
            status: transaction.status.as_str().to_string(),
        }
    }
}

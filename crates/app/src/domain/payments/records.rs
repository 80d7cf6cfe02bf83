//! Payment Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;

use crate::{
    domain::orders::records::{OrderUuid, UnknownVariant},
    uuids::TypedUuid,
};

/// Gateway transaction id. Generated by the store and echoed back on every callback.
pub type TransactionId = TypedUuid<PaymentTransactionRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Initiated,
    Succeeded,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "initiated" => Ok(Self::Initiated),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownVariant {
                kind: "transaction status",
                value: other.to_string(),
            }),
        }
    }
}

/// What the gateway reported when it sent the shopper back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Fail,
    Cancel,
}

impl PaymentOutcome {
    #[must_use]
    pub const fn transaction_status(self) -> TransactionStatus {
        match self {
            Self::Success => TransactionStatus::Succeeded,
            Self::Fail => TransactionStatus::Failed,
            Self::Cancel => TransactionStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTransactionRecord {
    pub tran_id: TransactionId,
    pub order_uuid: OrderUuid,
    pub amount: u64,
    pub currency: String,
    /// Gateway validation id, recorded once a success has been verified.
    pub val_id: Option<String>,
    pub status: TransactionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A started payment: the recorded transaction and where to send the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRedirect {
    pub transaction: PaymentTransactionRecord,
    pub redirect_url: String,
}

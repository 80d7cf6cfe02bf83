//! Payments service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    orders::{
        OrdersServiceError,
        records::{OrderStatus, PaymentMethod},
    },
    payments::{gateway::PaymentGatewayError, records::TransactionStatus},
};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("payment transaction already exists")]
    AlreadyExists,

    #[error("order or payment transaction not found")]
    NotFound,

    /// Only pending orders placed for online payment can be paid through the gateway.
    #[error("a {status} order paid by {method} cannot be paid online")]
    NotPayable {
        method: PaymentMethod,
        status: OrderStatus,
    },

    #[error("payment transaction is already {0}")]
    AlreadyCompleted(TransactionStatus),

    /// The gateway did not confirm a reported success.
    #[error("payment could not be verified: {0}")]
    Unverified(&'static str),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("payment gateway failed")]
    Gateway(#[source] PaymentGatewayError),

    #[error("failed to update order")]
    Order(#[source] OrdersServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<PaymentGatewayError> for PaymentsServiceError {
    fn from(error: PaymentGatewayError) -> Self {
        Self::Gateway(error)
    }
}

impl From<OrdersServiceError> for PaymentsServiceError {
    fn from(error: OrdersServiceError) -> Self {
        match error {
            OrdersServiceError::Sql(source) => Self::Sql(source),
            error => Self::Order(error),
        }
    }
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

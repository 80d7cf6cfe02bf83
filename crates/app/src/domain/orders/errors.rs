//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{invoices::InvoicesServiceError, orders::status::InvalidTransition};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("failed to generate invoice")]
    Invoice(#[source] InvoicesServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<InvoicesServiceError> for OrdersServiceError {
    fn from(error: InvoicesServiceError) -> Self {
        match error {
            InvoicesServiceError::Sql(source) => Self::Sql(source),
            error => Self::Invoice(error),
        }
    }
}

impl From<Error> for OrdersServiceError {
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

//! Accounts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::accounts::email::EmailError;

#[derive(Debug, Error)]
pub enum AccountsServiceError {
    #[error("customer already exists")]
    AlreadyExists,

    #[error("customer or session not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid or expired OTP code")]
    InvalidOtp,

    #[error("too many failed attempts")]
    RateLimited,

    #[error("email delivery failed")]
    Email(#[from] EmailError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AccountsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => {
                Self::Sql(error)
            }
        }
    }
}

//! Coupons service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::coupons::{instant::InstantParseError, rules::CouponRejection};

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("coupon already exists")]
    AlreadyExists,

    #[error("coupon not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("coupon has already been used")]
    AlreadyUsed,

    #[error("coupon rejected")]
    Rejected(#[source] CouponRejection),

    #[error("invalid coupon window")]
    InvalidWindow(#[from] InstantParseError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<CouponRejection> for CouponsServiceError {
    fn from(rejection: CouponRejection) -> Self {
        match rejection {
            CouponRejection::AlreadyUsed => Self::AlreadyUsed,
            rejection => Self::Rejected(rejection),
        }
    }
}

impl From<Error> for CouponsServiceError {
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

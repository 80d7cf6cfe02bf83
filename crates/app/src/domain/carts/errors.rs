//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::coupons::rules::CouponRejection;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart already exists")]
    AlreadyExists,

    #[error("cart item not found")]
    NotFound,

    #[error("customer has no open cart")]
    NoOpenCart,

    #[error("product not found")]
    ProductNotFound,

    #[error("no variant matches the selection")]
    VariantNotFound,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("coupon not found")]
    CouponNotFound,

    #[error("coupon rejected")]
    CouponRejected(#[source] CouponRejection),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
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

//! Checkout errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    checkout::form::FieldError, coupons::CouponsServiceError, invoices::InvoicesServiceError,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("customer has no open cart")]
    NoOpenCart,

    #[error("cart is empty")]
    EmptyCart,

    #[error("checkout form has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The named form field references a location that does not exist or does not belong to
    /// its parent.
    #[error("{field} does not reference a known location")]
    UnknownLocation { field: &'static str },

    #[error("coupon can no longer be used")]
    Coupon(#[source] CouponsServiceError),

    #[error("failed to generate invoice")]
    Invoice(#[source] InvoicesServiceError),

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<CouponsServiceError> for CheckoutError {
    fn from(error: CouponsServiceError) -> Self {
        match error {
            CouponsServiceError::Sql(source) => Self::Sql(source),
            error => Self::Coupon(error),
        }
    }
}

impl From<InvoicesServiceError> for CheckoutError {
    fn from(error: InvoicesServiceError) -> Self {
        match error {
            InvoicesServiceError::Sql(source) => Self::Sql(source),
            error => Self::Invoice(error),
        }
    }
}

impl From<Error> for CheckoutError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NoOpenCart;
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

#[cfg(test)]
mod tests {
    use crate::domain::coupons::rules::CouponRejection;

    use super::*;

    #[test]
    fn coupon_storage_errors_become_checkout_storage_errors() {
        let error = CheckoutError::from(CouponsServiceError::Sql(Error::PoolClosed));

        assert!(matches!(error, CheckoutError::Sql(Error::PoolClosed)));
    }

    #[test]
    fn coupon_rejections_stay_coupon_errors() {
        let error = CheckoutError::from(CouponsServiceError::Rejected(
            CouponRejection::UsageLimitReached,
        ));

        assert!(matches!(
            error,
            CheckoutError::Coupon(CouponsServiceError::Rejected(
                CouponRejection::UsageLimitReached
            ))
        ));
    }
}

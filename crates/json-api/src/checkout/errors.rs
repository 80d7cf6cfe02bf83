//! Checkout Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::{checkout::CheckoutError, coupons::CouponsServiceError};

/// Failures the shopper can fix, as flash-style messages.
pub(crate) fn user_messages(error: &CheckoutError) -> Option<Vec<String>> {
    match error {
        CheckoutError::Validation(fields) => {
            Some(fields.iter().map(ToString::to_string).collect())
        }
        CheckoutError::NoOpenCart | CheckoutError::EmptyCart => {
            Some(vec!["Your cart is empty.".to_string()])
        }
        CheckoutError::UnknownLocation { .. } => Some(vec![error.to_string()]),
        CheckoutError::Coupon(
            source @ (CouponsServiceError::Rejected(_) | CouponsServiceError::AlreadyUsed),
        ) => Some(vec![format!(
            "The applied coupon can no longer be used: {source}"
        )]),
        _ => None,
    }
}

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        CheckoutError::InvalidReference
        | CheckoutError::MissingRequiredData
        | CheckoutError::InvalidData => StatusError::bad_request().brief("Invalid checkout"),
        CheckoutError::Coupon(source) => {
            error!("coupon redemption during checkout failed: {source}");

            StatusError::internal_server_error()
        }
        CheckoutError::Invoice(source) => {
            error!("invoice generation during checkout failed: {source}");

            StatusError::internal_server_error()
        }
        CheckoutError::Sql(source) => {
            error!("checkout storage failed: {source}");

            StatusError::internal_server_error()
        }
        error => StatusError::bad_request().brief(error.to_string()),
    }
}

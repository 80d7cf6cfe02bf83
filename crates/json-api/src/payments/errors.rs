//! Payment Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use storefront_app::domain::payments::PaymentsServiceError;

use crate::orders::errors::into_status_error as order_status_error;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::NotFound => {
            StatusError::not_found().brief("Order or payment transaction not found")
        }
        PaymentsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Payment transaction already exists")
        }
        error @ (PaymentsServiceError::NotPayable { .. }
        | PaymentsServiceError::AlreadyCompleted(_)) => {
            StatusError::conflict().brief(error.to_string())
        }
        PaymentsServiceError::Unverified(reason) => {
            warn!("payment callback rejected: {reason}");

            StatusError::bad_request().brief("Payment could not be verified")
        }
        PaymentsServiceError::InvalidReference
        | PaymentsServiceError::MissingRequiredData
        | PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid payment")
        }
        PaymentsServiceError::Gateway(source) => {
            error!("payment gateway failed: {source}");

            StatusError::bad_gateway().brief("Payment gateway unavailable")
        }
        PaymentsServiceError::Order(source) => order_status_error(source),
        PaymentsServiceError::Sql(source) => {
            error!("payment storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

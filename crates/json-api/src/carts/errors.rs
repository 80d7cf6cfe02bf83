//! Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::AlreadyExists => StatusError::conflict().brief("Cart already exists"),
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::NoOpenCart => StatusError::not_found().brief("No open cart"),
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::VariantNotFound => {
            StatusError::bad_request().brief("No variant matches the selected options")
        }
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be at least 1")
        }
        CartsServiceError::CouponNotFound => StatusError::not_found().brief("Coupon not found"),
        CartsServiceError::CouponRejected(rejection) => {
            StatusError::bad_request().brief(rejection.to_string())
        }
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::{invoices::InvoicesServiceError, orders::OrdersServiceError};

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidTransition(transition) => {
            StatusError::conflict().brief(transition.to_string())
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => StatusError::bad_request().brief("Invalid order"),
        OrdersServiceError::Invoice(source) => invoice_status_error(source),
        OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn invoice_status_error(error: InvoicesServiceError) -> StatusError {
    match error {
        InvoicesServiceError::NotFound => StatusError::not_found().brief("Invoice not found"),
        InvoicesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Invoice already exists")
        }
        InvoicesServiceError::InvalidReference
        | InvoicesServiceError::MissingRequiredData
        | InvoicesServiceError::InvalidData => StatusError::bad_request().brief("Invalid invoice"),
        InvoicesServiceError::Render(source) => {
            error!("invoice rendering failed: {source}");

            StatusError::internal_server_error()
        }
        InvoicesServiceError::Sql(source) => {
            error!("invoice storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

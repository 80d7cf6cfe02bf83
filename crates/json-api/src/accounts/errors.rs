//! Account Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::accounts::AccountsServiceError;

pub(crate) fn into_status_error(error: AccountsServiceError) -> StatusError {
    match error {
        AccountsServiceError::AlreadyExists => {
            StatusError::conflict().brief("An account with this email already exists")
        }
        AccountsServiceError::NotFound => StatusError::not_found().brief("Account not found"),
        AccountsServiceError::MissingRequiredData | AccountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid account details")
        }
        AccountsServiceError::InvalidOtp => {
            StatusError::unauthorized().brief("Invalid or expired code")
        }
        AccountsServiceError::RateLimited => StatusError::too_many_requests()
            .brief("Too many failed attempts, please try again later"),
        AccountsServiceError::Email(source) => {
            error!("failed to deliver login code: {source}");

            StatusError::bad_gateway().brief("Could not send the login code")
        }
        AccountsServiceError::Sql(source) => {
            error!("account storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

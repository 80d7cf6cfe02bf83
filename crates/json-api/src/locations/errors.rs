//! Location Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::locations::LocationsServiceError;

pub(crate) fn into_status_error(error: LocationsServiceError) -> StatusError {
    match error {
        LocationsServiceError::NotFound | LocationsServiceError::InvalidReference => {
            StatusError::not_found().brief("Location not found")
        }
        LocationsServiceError::AlreadyExists
        | LocationsServiceError::MissingRequiredData
        | LocationsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid location request")
        }
        LocationsServiceError::Sql(source) => {
            error!("failed to load locations: {source}");

            StatusError::internal_server_error()
        }
    }
}

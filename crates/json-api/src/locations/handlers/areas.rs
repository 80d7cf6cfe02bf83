//! List Areas Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    locations::{errors::into_status_error, handlers::LocationsResponse},
    state::State,
};

/// List Areas Handler
#[endpoint(
    tags("locations"),
    summary = "List Areas in a City",
    responses(
        (status_code = StatusCode::OK, description = "Areas by name"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    city: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<LocationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let areas = state
        .app
        .locations
        .list_areas(city.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(LocationsResponse::from_pairs(
        areas
            .into_iter()
            .map(|area| (area.uuid.into_uuid(), area.name)),
    )))
}

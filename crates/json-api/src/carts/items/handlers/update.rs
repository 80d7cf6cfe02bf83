//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity, at least 1
    pub quantity: u64,
}

/// Update Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Change Cart Item Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Quantity updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.update",
    skip(item, json, depot),
    fields(
        customer_uuid = tracing::field::Empty,
        item_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;
    let item = item.into_inner();

    let span = tracing::Span::current();

    span.record("customer_uuid", tracing::field::display(customer));
    span.record("item_uuid", tracing::field::display(item));

    state
        .app
        .carts
        .update_item_quantity(customer, item.into(), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

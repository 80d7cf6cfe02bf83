//! List Orders Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{OrderResponse, errors::into_status_error},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
}

/// List Orders Handler
///
/// The authenticated customer's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(customer)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(OrderResponse::from).collect(),
    }))
}

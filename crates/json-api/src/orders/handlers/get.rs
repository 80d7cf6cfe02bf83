//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::records::OrderDetails;

use crate::{
    extensions::*,
    orders::{OrderLineResponse, OrderResponse, errors::into_status_error},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailsResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderLineResponse>,
}

impl From<OrderDetails> for OrderDetailsResponse {
    fn from(details: OrderDetails) -> Self {
        Self {
            order: details.order.into(),
            items: details.items.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

/// Get Order Handler
///
/// Another customer's order is reported as not found.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order with its items"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;

    let details = state
        .app
        .orders
        .get_order(customer, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(details.into()))
}

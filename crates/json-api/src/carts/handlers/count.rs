//! Cart Count Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartCountResponse {
    /// Sum of quantities in the open cart
    pub count: u64,
}

/// Cart Count Handler
///
/// Anonymous visitors have no cart and always see zero.
#[endpoint(
    tags("carts"),
    summary = "Cart Item Count",
    responses(
        (status_code = StatusCode::OK, description = "Item count"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartCountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let Some(customer) = depot.customer_uuid() else {
        return Ok(Json(CartCountResponse { count: 0 }));
    };

    let count = state
        .app
        .carts
        .item_count(customer)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartCountResponse { count }))
}

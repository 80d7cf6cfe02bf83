//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{carts::data::NewCartItem, catalog::variants::VariantAttributes};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

const fn default_quantity() -> u64 {
    1
}

/// Create Cart Item Request
///
/// Attribute fields select a variant; leave them out to add the bare product.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    pub product_uuid: Uuid,

    #[serde(default = "default_quantity")]
    pub quantity: u64,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub size: Option<String>,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub capacity: Option<String>,
}

impl From<CreateCartItemRequest> for NewCartItem {
    fn from(request: CreateCartItemRequest) -> Self {
        NewCartItem {
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity,
            selection: VariantAttributes {
                color: request.color,
                size: request.size,
                brand: request.brand,
                capacity: request.capacity,
            },
        }
    }
}

/// Cart Item Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemCreatedResponse {
    /// Cart line UUID
    pub uuid: Uuid,

    /// Line quantity after the add
    pub quantity: u64,
}

/// Create Cart Item Handler
///
/// Opens a cart on first use. Adding a line already in the cart raises its quantity.
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.create",
    skip(json, depot, res),
    fields(
        customer_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("customer_uuid", tracing::field::display(customer));
    span.record("product_uuid", tracing::field::display(request.product_uuid));

    let item = state
        .app
        .carts
        .add_item(customer, request.into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/cart/items/{}", item.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(CartItemCreatedResponse {
        uuid: item.uuid.into_uuid(),
        quantity: item.quantity,
    }))
}

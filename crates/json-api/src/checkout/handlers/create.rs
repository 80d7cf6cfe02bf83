//! Checkout Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::checkout::form::CheckoutForm;

use crate::{
    checkout::errors::{into_status_error, user_messages},
    extensions::*,
    orders::OrderResponse,
    state::State,
};

/// Checkout Request
///
/// Division, city and area fields hold location UUIDs. Billing fields are read only when
/// `billing_address_option` is `different`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub address_line: Option<String>,

    #[serde(default)]
    pub division: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub area: Option<String>,

    #[serde(default)]
    pub postal_code: Option<String>,

    /// `same` (default) or `different`
    #[serde(default)]
    pub billing_address_option: Option<String>,

    #[serde(default)]
    pub billing_address: Option<String>,

    #[serde(default)]
    pub billing_phone_number: Option<String>,

    #[serde(default)]
    pub billing_division: Option<String>,

    #[serde(default)]
    pub billing_city: Option<String>,

    #[serde(default)]
    pub billing_area: Option<String>,

    #[serde(default)]
    pub billing_postal_code: Option<String>,

    /// `cod` (default) or `online`
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl From<CheckoutRequest> for CheckoutForm {
    fn from(request: CheckoutRequest) -> Self {
        CheckoutForm {
            phone_number: request.phone_number,
            address_line: request.address_line,
            division: request.division,
            city: request.city,
            area: request.area,
            postal_code: request.postal_code,
            billing_address_option: request.billing_address_option,
            billing_address: request.billing_address,
            billing_phone_number: request.billing_phone_number,
            billing_division: request.billing_division,
            billing_city: request.billing_city,
            billing_area: request.billing_area,
            billing_postal_code: request.billing_postal_code,
            payment_method: request.payment_method,
        }
    }
}

/// Checkout Response
///
/// Carries the placed order on success and the reasons on failure.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderResponse>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

/// Checkout Handler
///
/// Turns the open cart into an order and redirects to it. Every invalid form field is
/// reported at once and nothing is written.
#[endpoint(
    tags("checkout"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::SEE_OTHER, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid form, empty cart or rejected coupon"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkout.create",
    skip(json, depot, res),
    fields(
        customer_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;

    let span = tracing::Span::current();

    span.record("customer_uuid", tracing::field::display(customer));

    let result = state
        .app
        .checkout
        .checkout(customer, json.into_inner().into(), Timestamp::now())
        .await;

    let order = match result {
        Ok(order) => order,
        Err(error) => {
            let Some(messages) = user_messages(&error) else {
                return Err(into_status_error(error));
            };

            res.status_code(StatusCode::BAD_REQUEST);

            return Ok(Json(CheckoutResponse {
                success: false,
                order: None,
                messages,
            }));
        }
    };

    span.record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::SEE_OTHER);

    tracing::info!(order_uuid = %order.uuid, order_number = %order.order_number, "placed order");

    Ok(Json(CheckoutResponse {
        success: true,
        order: Some(order.into()),
        messages: Vec::new(),
    }))
}

//! Get Cart Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::{
    domain::carts::{
        summary::{CartLine, CartSummary},
        totals::CartTotals,
    },
    money::format_taka,
};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
///
/// Amounts are in poisha.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// `None` until the first item is added
    pub uuid: Option<Uuid>,

    pub items: Vec<CartLineResponse>,

    /// Sum of quantities
    pub item_count: u64,

    /// Code of the attached coupon, when it still applies
    pub coupon_code: Option<String>,

    pub subtotal: u64,
    pub discount: u64,
    pub shipping_charge: u64,
    pub packaging_charge: u64,
    pub total: u64,

    /// e.g. `560 TK`
    pub total_display: String,
}

impl CartResponse {
    fn empty() -> Self {
        Self {
            uuid: None,
            items: Vec::new(),
            item_count: 0,
            coupon_code: None,
            subtotal: 0,
            discount: 0,
            shipping_charge: 0,
            packaging_charge: 0,
            total: 0,
            total_display: format_taka(0),
        }
    }
}

impl From<CartSummary> for CartResponse {
    fn from(summary: CartSummary) -> Self {
        let CartTotals {
            subtotal,
            discount,
            shipping_charge,
            packaging_charge,
            grand_total,
        } = summary.totals;

        Self {
            uuid: Some(summary.cart_uuid.into_uuid()),
            items: summary.lines.into_iter().map(Into::into).collect(),
            item_count: summary.item_count,
            coupon_code: summary.coupon.map(|coupon| coupon.code),
            subtotal,
            discount,
            shipping_charge,
            packaging_charge,
            total: grand_total,
            total_display: format_taka(grand_total),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub variant_uuid: Option<Uuid>,

    /// e.g. `Color: Black, Size: XL`
    pub variant: Option<String>,

    pub quantity: u64,

    /// Current price of one unit
    pub unit_price: u64,

    pub line_total: u64,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            uuid: line.item_uuid.into_uuid(),
            product_uuid: line.product_uuid.into_uuid(),
            product_name: line.product_name,
            variant_uuid: line.variant_uuid.map(|variant| variant.into_uuid()),
            variant: line.variant_label,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.line_total,
        }
    }
}

/// Get Cart Handler
///
/// Returns the open cart priced now. Without one the cart is empty and carries no fees.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Open cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .get_open_cart(customer, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.map_or_else(CartResponse::empty, Into::into)))
}

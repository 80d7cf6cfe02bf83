//! Order Handlers

pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod invoice;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::{
    domain::orders::records::{OrderItemRecord, OrderRecord},
    money::format_taka,
};

/// Order Response
///
/// Amounts are in poisha.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub order_number: String,

    /// `pending`, `paid`, `processing`, `shipped`, `delivered` or `cancelled`
    pub status: String,

    /// `cod` or `online`
    pub payment_method: String,

    pub subtotal: u64,
    pub discount: u64,
    pub shipping_charge: u64,
    pub packaging_charge: u64,
    pub total: u64,

    /// e.g. `560 TK`
    pub total_display: String,

    pub ordered_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            order_number: order.order_number,
            status: order.status.as_str().to_string(),
            payment_method: order.payment_method.as_str().to_string(),
            subtotal: order.subtotal,
            discount: order.discount,
            shipping_charge: order.shipping_charge,
            packaging_charge: order.packaging_charge,
            total: order.total_price,
            total_display: format_taka(order.total_price),
            ordered_at: order.ordered_at.to_string(),
        }
    }
}

/// One ordered line at the price paid.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,

    /// Product name with variant attributes, e.g. `T-Shirt (Color: Red)`
    pub description: String,

    pub quantity: u64,
    pub unit_price: u64,
    pub line_total: u64,
}

impl From<OrderItemRecord> for OrderLineResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            description: item.description(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total(),
        }
    }
}

//! Order Records

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    accounts::records::CustomerUuid,
    domain::{
        addresses::records::AddressUuid,
        carts::records::CartUuid,
        catalog::{
            records::{ProductUuid, VariantUuid},
            variants::VariantAttributes,
        },
        coupons::records::CouponUuid,
    },
    uuids::TypedUuid,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// How a customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    CashOnDelivery,
    Online,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cod",
            Self::Online => "online",
        }
    }

    /// Human-readable label for receipts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::Online => "Online Payment",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(Self::CashOnDelivery),
            "online" => Ok(Self::Online),
            other => Err(UnknownVariant {
                kind: "payment method",
                value: other.to_string(),
            }),
        }
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Paid,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "order status",
                value: s.to_string(),
            })
    }
}

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
///
/// Money fields are the values computed at checkout and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub cart_uuid: CartUuid,
    pub order_number: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub subtotal: u64,
    pub discount: u64,
    pub shipping_charge: u64,
    pub packaging_charge: u64,
    pub total_price: u64,
    pub coupon_uuid: Option<CouponUuid>,
    pub shipping_address_uuid: Option<AddressUuid>,
    pub billing_address_uuid: Option<AddressUuid>,
    pub phone_number: String,
    pub ordered_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Item Record with the product name and variant attributes for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub variant_uuid: Option<VariantUuid>,
    pub variant_attributes: Option<VariantAttributes>,
    pub quantity: u64,

    /// Unit price when the order was placed.
    pub unit_price: u64,
}

impl OrderItemRecord {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(self.quantity)
    }

    /// Product name followed by the variant label, if any.
    #[must_use]
    pub fn description(&self) -> String {
        match self
            .variant_attributes
            .as_ref()
            .filter(|attributes| !attributes.is_empty())
        {
            Some(attributes) => format!("{} ({attributes})", self.product_name),
            None => self.product_name.clone(),
        }
    }
}

/// An order with its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub order: OrderRecord,
    pub items: Vec<OrderItemRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_payment_method_is_rejected() {
        let result = "card".parse::<PaymentMethod>();

        assert_eq!(
            result,
            Err(UnknownVariant {
                kind: "payment method",
                value: "card".to_string(),
            })
        );
    }

    #[test]
    fn description_includes_variant_label() {
        let item = OrderItemRecord {
            uuid: OrderItemUuid::new(),
            order_uuid: OrderUuid::new(),
            product_uuid: ProductUuid::new(),
            product_name: "T-Shirt".to_string(),
            variant_uuid: Some(VariantUuid::new()),
            variant_attributes: Some(VariantAttributes {
                size: Some("M".to_string()),
                ..VariantAttributes::default()
            }),
            quantity: 3,
            unit_price: 450_00,
        };

        assert_eq!(item.description(), "T-Shirt (Size: M)");
        assert_eq!(item.line_total(), 1_350_00);
    }
}
